//! Error types for dispatch and serving.

use handlehttp_extract::{DecodeError, Problems};
use http::StatusCode;
use thiserror::Error;

/// Boxed error returned by business functions.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Why a request did not reach a successful response.
///
/// The `Display` text is what ends up in the `{"error": ...}` body.
#[derive(Debug, Error)]
pub enum DispatchError {
    /// The body or the query parameters could not be decoded.
    #[error("failed to decode request: {0}")]
    Decode(#[from] DecodeError),

    /// The decoded input reported problems; one `field: description` line each.
    #[error("invalid request: {} problems\n{}", .0.len(), .0)]
    Validation(Problems),

    /// The business function failed; its message is used unchanged.
    #[error("{0}")]
    Business(BoxError),
}

impl DispatchError {
    /// Returns the status written for this error.
    ///
    /// Every variant maps to 400. Encode failures never reach here: the
    /// writer logs them after the status is committed.
    #[must_use]
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Decode(_) | Self::Validation(_) | Self::Business(_) => StatusCode::BAD_REQUEST,
        }
    }

    /// Returns the problems of a validation failure.
    #[must_use]
    pub fn problems(&self) -> Option<&Problems> {
        match self {
            Self::Validation(problems) => Some(problems),
            _ => None,
        }
    }

    /// Wraps a business failure.
    pub fn business(err: impl Into<BoxError>) -> Self {
        Self::Business(err.into())
    }
}

/// Errors raised while serving connections.
#[derive(Debug, Error)]
pub enum ServerError {
    /// The listener could not be bound.
    #[error("failed to bind {addr}: {source}")]
    Bind {
        /// Address that was requested.
        addr: String,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The handler did not produce a response within the write timeout.
    #[error("handler exceeded write timeout of {0:?}")]
    WriteTimeout(std::time::Duration),

    /// Other I/O failure.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;
    use handlehttp_extract::DecodeSource;

    #[test]
    fn test_decode_message_carries_tag() {
        let err = DispatchError::from(DecodeError::invalid_type(
            DecodeSource::Query,
            "id",
            "invalid digit found in string",
        ));

        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert!(err
            .to_string()
            .starts_with("failed to decode request: decode params: "));
    }

    #[test]
    fn test_validation_message_lists_problems() {
        let mut problems = Problems::new();
        problems.add("name", "is required").add("age", "must be positive");

        let err = DispatchError::Validation(problems);

        assert_eq!(
            err.to_string(),
            "invalid request: 2 problems\nname: is required\nage: must be positive\n"
        );
        assert_eq!(err.problems().map(Problems::len), Some(2));
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_business_message_unchanged() {
        let err = DispatchError::business("user not found");

        assert_eq!(err.to_string(), "user not found");
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert!(err.problems().is_none());
    }

    #[test]
    fn test_bind_error_display() {
        let err = ServerError::Bind {
            addr: "127.0.0.1:1".into(),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        };

        assert_eq!(err.to_string(), "failed to bind 127.0.0.1:1: denied");
    }
}
