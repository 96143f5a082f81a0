//! Decode error types.
//!
//! Every failure while turning a request into an input value is a
//! [`DecodeError`], tagged with the part of the request that failed.

use http::StatusCode;
use std::fmt;

/// Part of the request a decode error originated from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeSource {
    /// Request body (JSON).
    Body,
    /// Query string parameters.
    Query,
}

impl DecodeSource {
    /// Tag prepended to every message from this source.
    #[must_use]
    pub fn tag(self) -> &'static str {
        match self {
            Self::Body => "decode json",
            Self::Query => "decode params",
        }
    }
}

impl fmt::Display for DecodeSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Body => write!(f, "body"),
            Self::Query => write!(f, "query"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DecodeErrorKind {
    /// Required parameter is missing
    Missing,
    /// Value has invalid type or format
    InvalidType,
    /// Deserialization failed
    DeserializationFailed,
    /// Caller-defined decode failure
    Custom,
}

/// Error produced while decoding a request into an input value.
///
/// The display form is tagged with its source, so body and parameter
/// failures are distinguishable in the error message sent to the client.
///
/// # Example
///
/// ```rust
/// use handlehttp_extract::{DecodeError, DecodeSource};
///
/// let err = DecodeError::invalid_type(DecodeSource::Query, "id", "invalid digit found in string");
/// assert_eq!(err.decode_source(), DecodeSource::Query);
/// assert_eq!(
///     err.to_string(),
///     "decode params: invalid query parameter 'id': invalid digit found in string"
/// );
/// ```
#[derive(Debug, Clone)]
pub struct DecodeError {
    decode_source: DecodeSource,
    kind: DecodeErrorKind,
    field: Option<String>,
    message: String,
}

impl DecodeError {
    /// Creates an error for a missing parameter.
    #[must_use]
    pub fn missing(source: DecodeSource, field: impl Into<String>) -> Self {
        let field = field.into();
        Self {
            decode_source: source,
            kind: DecodeErrorKind::Missing,
            message: format!("missing required {source} parameter: {field}"),
            field: Some(field),
        }
    }

    /// Creates an error for a value of the wrong type or format.
    #[must_use]
    pub fn invalid_type(
        source: DecodeSource,
        field: impl Into<String>,
        details: impl fmt::Display,
    ) -> Self {
        let field = field.into();
        Self {
            decode_source: source,
            kind: DecodeErrorKind::InvalidType,
            message: format!("invalid {source} parameter '{field}': {details}"),
            field: Some(field),
        }
    }

    /// Creates an error for a failed deserialization.
    #[must_use]
    pub fn deserialization_failed(source: DecodeSource, error: impl fmt::Display) -> Self {
        Self {
            decode_source: source,
            kind: DecodeErrorKind::DeserializationFailed,
            message: error.to_string(),
            field: None,
        }
    }

    /// Creates a caller-defined parameter decode error.
    ///
    /// Use this from [`DecodeParams::decode`](crate::DecodeParams::decode)
    /// when the failure doesn't fit the other constructors.
    #[must_use]
    pub fn custom(message: impl Into<String>) -> Self {
        Self {
            decode_source: DecodeSource::Query,
            kind: DecodeErrorKind::Custom,
            message: message.into(),
            field: None,
        }
    }

    /// Returns the part of the request the error came from.
    #[must_use]
    pub fn decode_source(&self) -> DecodeSource {
        self.decode_source
    }

    /// Returns the offending field, if known.
    #[must_use]
    pub fn field(&self) -> Option<&str> {
        self.field.as_deref()
    }

    /// Returns the untagged message.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Status code for this error. Decode failures are always client errors.
    #[must_use]
    pub fn status_code(&self) -> StatusCode {
        StatusCode::BAD_REQUEST
    }

    /// Returns an error code suitable for structured logs.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self.kind {
            DecodeErrorKind::Missing => "MISSING_PARAMETER",
            DecodeErrorKind::InvalidType => "INVALID_PARAMETER",
            DecodeErrorKind::DeserializationFailed => "DESERIALIZATION_FAILED",
            DecodeErrorKind::Custom => "DECODE_FAILED",
        }
    }
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.decode_source.tag(), self.message)
    }
}

impl std::error::Error for DecodeError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_error() {
        let err = DecodeError::missing(DecodeSource::Query, "id");

        assert_eq!(err.decode_source(), DecodeSource::Query);
        assert_eq!(err.field(), Some("id"));
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(err.error_code(), "MISSING_PARAMETER");
        assert_eq!(
            err.to_string(),
            "decode params: missing required query parameter: id"
        );
    }

    #[test]
    fn test_invalid_type_error() {
        let err = DecodeError::invalid_type(DecodeSource::Query, "limit", "expected integer");

        assert_eq!(err.field(), Some("limit"));
        assert_eq!(err.error_code(), "INVALID_PARAMETER");
        assert!(err.to_string().contains("limit"));
        assert!(err.to_string().contains("expected integer"));
    }

    #[test]
    fn test_body_errors_are_tagged_differently() {
        let body = DecodeError::deserialization_failed(DecodeSource::Body, "EOF");
        let query = DecodeError::deserialization_failed(DecodeSource::Query, "EOF");

        assert_eq!(body.to_string(), "decode json: EOF");
        assert_eq!(query.to_string(), "decode params: EOF");
        assert_eq!(body.field(), None);
        assert_eq!(body.message(), "EOF");
    }

    #[test]
    fn test_custom_error() {
        let err = DecodeError::custom("parse id: not a number");

        assert_eq!(err.decode_source(), DecodeSource::Query);
        assert_eq!(err.error_code(), "DECODE_FAILED");
        assert_eq!(err.to_string(), "decode params: parse id: not a number");
    }

    #[test]
    fn test_decode_source_display() {
        assert_eq!(DecodeSource::Body.to_string(), "body");
        assert_eq!(DecodeSource::Query.to_string(), "query");
    }
}
