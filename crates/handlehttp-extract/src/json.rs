//! JSON body decoding.
//!
//! Bodies are decoded with `serde_json`. A missing body is read as `{}` so
//! that body-less requests (typically `GET`) still reach parameter decoding.

use crate::{DecodeError, DecodeSource};
use serde::de::DeserializeOwned;

/// What an empty body decodes as.
const EMPTY_OBJECT: &[u8] = b"{}";

/// Decodes a request body into `T`.
///
/// An empty (or whitespace-only) body is treated as `{}`, so `T` decodes from
/// an empty object: any field with a serde default is filled, any required
/// field is reported missing.
///
/// # Example
///
/// ```rust
/// use handlehttp_extract::decode_body;
/// use serde::Deserialize;
///
/// #[derive(Deserialize, Default)]
/// #[serde(default)]
/// struct Greeting {
///     message: String,
/// }
///
/// let greeting: Greeting = decode_body(br#"{"message":"hi"}"#).unwrap();
/// assert_eq!(greeting.message, "hi");
///
/// let empty: Greeting = decode_body(b"").unwrap();
/// assert_eq!(empty.message, "");
/// ```
pub fn decode_body<T: DeserializeOwned>(body: &[u8]) -> Result<T, DecodeError> {
    let body = if body.iter().all(u8::is_ascii_whitespace) {
        EMPTY_OBJECT
    } else {
        body
    };

    serde_json::from_slice(body)
        .map_err(|e| DecodeError::deserialization_failed(DecodeSource::Body, e))
}
