//! # handlehttp Extract
//!
//! Request decoding and validation contracts for handlehttp.
//!
//! An input type is anything that is [`serde::Deserialize`], merges query
//! parameters through [`DecodeParams`], and checks itself through
//! [`Validator`]. Such types get the [`Input`] marker automatically and can
//! be used with the dispatch pipeline in `handlehttp-server`.
//!
//! | Item | Role |
//! |------|------|
//! | [`decode_body`] | JSON body → value, empty body read as `{}` |
//! | [`QueryParams`] | Parsed query string handed to [`DecodeParams`] |
//! | [`decode_request`] | Body first, then parameters on top |
//! | [`Problems`] | Field → description set returned by [`Validator::valid`] |
//! | [`DecodeError`] | Tagged decode failure (`decode json` / `decode params`) |
//!
//! ## Example
//!
//! ```rust
//! use handlehttp_extract::{
//!     decode_request, DecodeError, DecodeParams, Problems, QueryParams, RequestContext, Validator,
//! };
//! use http::Uri;
//! use serde::Deserialize;
//!
//! #[derive(Deserialize, Default)]
//! #[serde(default)]
//! struct Greeting {
//!     message: String,
//!     id: i64,
//! }
//!
//! impl DecodeParams for Greeting {
//!     fn decode(&mut self, _ctx: &RequestContext, params: &QueryParams) -> Result<(), DecodeError> {
//!         self.id = params.parse("id")?;
//!         Ok(())
//!     }
//! }
//!
//! impl Validator for Greeting {
//!     fn valid(&self, _ctx: &RequestContext) -> Problems {
//!         let mut problems = Problems::new();
//!         problems.check(self.id <= 0, "id", "must be positive");
//!         problems
//!     }
//! }
//!
//! let ctx = RequestContext::builder().uri(Uri::from_static("/?id=1")).build();
//! let greeting: Greeting = decode_request(&ctx, br#"{"message":"Hello"}"#).unwrap();
//!
//! assert_eq!(greeting.id, 1);
//! assert!(greeting.valid(&ctx).is_empty());
//! ```

#![doc(html_root_url = "https://docs.rs/handlehttp-extract/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod context;
mod decode;
mod error;
mod json;
mod query;
mod validate;

pub use context::{RequestContext, RequestContextBuilder, RequestId};
pub use decode::{decode_request, DecodeParams, Input};
pub use error::{DecodeError, DecodeSource};
pub use json::decode_body;
pub use query::QueryParams;
pub use validate::{Problems, Validator};
