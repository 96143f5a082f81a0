//! # handlehttp
//!
//! **Typed JSON request handlers with validation and graceful shutdown**
//!
//! handlehttp turns an async business function into an HTTP handler:
//!
//! - **Decode**: JSON body into the input type, empty body read as `{}`
//! - **Merge**: query parameters through the input's own [`DecodeParams`]
//! - **Validate**: the input reports [`Problems`]; any problem is a 400
//! - **Respond**: the output as JSON with 200, failures as `{"error": ...}` with 400
//!
//! [`run`] serves such a handler until cancelled or interrupted, then drains
//! in-flight requests within a bounded time.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use handlehttp::prelude::*;
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Deserialize, Default)]
//! #[serde(default)]
//! struct Lookup {
//!     id: i64,
//! }
//!
//! impl DecodeParams for Lookup {
//!     fn decode(&mut self, _ctx: &RequestContext, params: &QueryParams) -> Result<(), DecodeError> {
//!         self.id = params.parse("id")?;
//!         Ok(())
//!     }
//! }
//!
//! impl Validator for Lookup {
//!     fn valid(&self, _ctx: &RequestContext) -> Problems {
//!         let mut problems = Problems::new();
//!         problems.check(self.id <= 0, "id", "must be positive");
//!         problems
//!     }
//! }
//!
//! #[derive(Serialize)]
//! struct Found {
//!     id: i64,
//! }
//!
//! async fn lookup(_ctx: RequestContext, input: Lookup) -> Result<Found, String> {
//!     Ok(Found { id: input.id })
//! }
//!
//! #[tokio::main]
//! async fn main() {
//!     let logger = TracingLogger::shared();
//!     let handler = handle(logger.clone(), lookup);
//!
//!     run(ShutdownSignal::new(), logger, handler, "127.0.0.1", "8080").await;
//! }
//! ```
//!
//! ## Crates
//!
//! | Crate | Contents |
//! |-------|----------|
//! | [`extract`] | Request context, query parameters, decoding and validation contracts |
//! | [`server`] | Dispatch pipeline, response writer, logger capability, server lifecycle |
//! | [`telemetry`] | `tracing-subscriber` setup |

#![doc(html_root_url = "https://docs.rs/handlehttp/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub use handlehttp_extract as extract;
pub use handlehttp_server as server;
pub use handlehttp_telemetry as telemetry;

pub use handlehttp_extract::{DecodeParams, Input, Problems, RequestContext, Validator};
pub use handlehttp_server::{handle, handle_with, respond, run, Logger, Server, ShutdownSignal};

/// Prelude module for convenient imports.
///
/// ```rust
/// use handlehttp::prelude::*;
/// ```
pub mod prelude {
    pub use handlehttp_extract::{
        DecodeError, DecodeParams, Input, Problems, QueryParams, RequestContext, RequestId,
        Validator,
    };

    pub use handlehttp_server::{
        handle, handle_with, respond, run, BoxError, DispatchError, Endpoint, Handler, Logger,
        Server, ServerConfig, SharedLogger, ShutdownSignal, TracingLogger,
    };

    pub use handlehttp_telemetry::{init_logging, LogConfig};
}
