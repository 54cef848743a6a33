//! Error types and result aliases for viewtrace.
//!
//! This module defines the core error type [`ViewTraceError`] and the [`Result`] type alias
//! used throughout the crate. View hooks raise these errors; the tracer never creates or
//! wraps them, it only lets them pass through.

use axum::http::StatusCode;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ViewTraceError {
    #[error("Not found.")]
    NotFound,

    #[error("Could not satisfy the request Accept header.")]
    NotAcceptable,

    #[error("You do not have permission to perform this action.")]
    PermissionDenied,

    #[error("Request was throttled.")]
    Throttled(Option<u64>),

    #[error("Method \"{0}\" not allowed.")]
    MethodNotAllowed(String),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Invalid configuration: {0}")]
    ConfigError(String),

    #[error("Server error: {0}")]
    ServerError(String),
}

impl ViewTraceError {
    /// HTTP status a view reports for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::NotAcceptable => StatusCode::NOT_ACCEPTABLE,
            Self::PermissionDenied => StatusCode::FORBIDDEN,
            Self::Throttled(_) => StatusCode::TOO_MANY_REQUESTS,
            Self::MethodNotAllowed(_) => StatusCode::METHOD_NOT_ALLOWED,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Whether the error is an expected client-facing API error.
    ///
    /// Anything else is a server fault and its message is not exposed in responses.
    pub fn is_api_error(&self) -> bool {
        matches!(
            self,
            Self::NotFound
                | Self::NotAcceptable
                | Self::PermissionDenied
                | Self::Throttled(_)
                | Self::MethodNotAllowed(_)
        )
    }

    /// Text placed in the `detail` field of an error response.
    pub fn detail(&self) -> String {
        match self {
            Self::Throttled(Some(wait)) => {
                let plural = if *wait != 1 { "s" } else { "" };
                format!("Request was throttled. Expected available in {} second{}.", wait, plural)
            }
            err if err.is_api_error() => err.to_string(),
            _ => "A server error occurred.".to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ViewTraceError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_display() {
        let err = ViewTraceError::NotFound;
        assert_eq!(err.to_string(), "Not found.");
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_method_not_allowed_display() {
        let err = ViewTraceError::MethodNotAllowed("POST".to_string());
        assert_eq!(err.to_string(), "Method \"POST\" not allowed.");
        assert_eq!(err.status_code(), StatusCode::METHOD_NOT_ALLOWED);
    }

    #[test]
    fn test_throttled_detail_with_wait() {
        assert_eq!(
            ViewTraceError::Throttled(Some(3)).detail(),
            "Request was throttled. Expected available in 3 seconds."
        );
        assert_eq!(
            ViewTraceError::Throttled(Some(1)).detail(),
            "Request was throttled. Expected available in 1 second."
        );
        assert_eq!(ViewTraceError::Throttled(None).detail(), "Request was throttled.");
    }

    #[test]
    fn test_not_acceptable_is_an_api_error() {
        let err = ViewTraceError::NotAcceptable;
        assert!(err.is_api_error());
        assert_eq!(err.status_code(), StatusCode::NOT_ACCEPTABLE);
        assert_eq!(err.detail(), "Could not satisfy the request Accept header.");
    }

    #[test]
    fn test_server_errors_hide_their_message() {
        let err = ViewTraceError::ServerError("queryset missing".to_string());
        assert!(!err.is_api_error());
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.detail(), "A server error occurred.");
    }

    #[test]
    fn test_serialization_error_conversion() {
        let json_err = serde_json::from_str::<serde_json::Value>("invalid json").unwrap_err();
        let err: ViewTraceError = json_err.into();

        match err {
            ViewTraceError::SerializationError(_) => {}
            _ => panic!("Expected SerializationError"),
        }
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: ViewTraceError = io_err.into();

        match err {
            ViewTraceError::IoError(_) => {}
            _ => panic!("Expected IoError"),
        }
    }

    #[test]
    fn test_config_error_display() {
        let err = ViewTraceError::ConfigError("bad bind address".to_string());
        assert_eq!(err.to_string(), "Invalid configuration: bad bind address");
    }
}
