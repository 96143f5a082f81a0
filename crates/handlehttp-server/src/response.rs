//! JSON response writing.

use bytes::Bytes;
use http::header::{HeaderValue, CONTENT_TYPE};
use http::{Response, StatusCode};
use http_body_util::Full;
use serde::Serialize;

use crate::Logger;

/// Body type of every response the pipeline writes.
pub type ResponseBody = Full<Bytes>;

/// Response type of every handler.
pub type HttpResponse = Response<ResponseBody>;

/// Body written for failed requests: `{"error": "<message>"}`.
#[derive(Debug, Serialize)]
pub struct ErrorBody<'a> {
    /// Human-readable failure message.
    pub error: &'a str,
}

/// Writes `value` as JSON with `status`.
///
/// The status and `Content-Type: application/json` are fixed before encoding,
/// so an encode failure cannot change them: it is logged at error level and
/// the body is left empty.
///
/// # Example
///
/// ```rust
/// use handlehttp_server::{respond, TracingLogger};
/// use http::StatusCode;
///
/// let response = respond(StatusCode::OK, &TracingLogger, &"hello");
///
/// assert_eq!(response.status(), StatusCode::OK);
/// assert_eq!(response.headers()["content-type"], "application/json");
/// ```
pub fn respond<T>(status: StatusCode, logger: &dyn Logger, value: &T) -> HttpResponse
where
    T: Serialize + ?Sized,
{
    let body = match serde_json::to_vec(value) {
        Ok(bytes) => Bytes::from(bytes),
        Err(e) => {
            logger.error(format_args!("encode json: {e}"));
            Bytes::new()
        }
    };

    let mut response = Response::new(Full::new(body));
    *response.status_mut() = status;
    response
        .headers_mut()
        .insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    response
}

/// Writes `{"error": message}` with `status`.
pub fn respond_error(status: StatusCode, logger: &dyn Logger, message: &str) -> HttpResponse {
    respond(status, logger, &ErrorBody { error: message })
}
