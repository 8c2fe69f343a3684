//! Error types for the DropSend receiving server.
//!
//! - [`ConfigError`] - invalid startup configuration
//! - [`StoreError`] - writing an upload to disk
//! - [`ServerError`] - request-level failures, mapped to HTTP responses
//!
//! Error conversion is automatic via `From` implementations,
//! allowing `?` to work across error boundaries.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use std::path::PathBuf;
use thiserror::Error;

use crate::api::types::error_response;

// =============================================================================
// Configuration Errors
// =============================================================================

/// Errors while validating the server configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Upload directory is missing.
    #[error("Upload directory does not exist: {0}")]
    MissingDirectory(PathBuf),

    /// Upload path exists but is a file.
    #[error("Upload path is not a directory: {0}")]
    NotADirectory(PathBuf),

    /// Listen address could not be parsed.
    #[error("Invalid listen address '{0}'")]
    InvalidListen(String),
}

// =============================================================================
// Storage Errors
// =============================================================================

/// Errors while storing an upload.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The client did not send a file name.
    #[error("File name not provided")]
    MissingFileName,

    /// The file name has no usable final component.
    #[error("Invalid file name: {0}")]
    InvalidFileName(String),

    /// Could not create the destination file.
    #[error("Failed to create file: {0}")]
    Create(#[source] std::io::Error),

    /// Copying the body failed midway.
    #[error("Failed to copy file: {0}")]
    Copy(#[source] std::io::Error),

    /// The request body stream broke.
    #[error("Failed to read request body: {0}")]
    Body(String),

    /// The body went past the configured upload cap.
    #[error("Upload exceeds the size limit")]
    TooLarge,
}

// =============================================================================
// Server Errors
// =============================================================================

/// HTTP request errors.
#[derive(Debug, Error)]
pub enum ServerError {
    /// Storage error.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Invalid request.
    #[error("Invalid request: {0}")]
    BadRequest(String),
}

impl ServerError {
    /// HTTP status for this error.
    pub fn status(&self) -> StatusCode {
        match self {
            ServerError::Store(StoreError::MissingFileName)
            | ServerError::Store(StoreError::InvalidFileName(_))
            | ServerError::Store(StoreError::Body(_))
            | ServerError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ServerError::Store(StoreError::TooLarge) => StatusCode::PAYLOAD_TOO_LARGE,
            ServerError::Store(StoreError::Create(_)) | ServerError::Store(StoreError::Copy(_)) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        (self.status(), Json(error_response(&self.to_string()))).into_response()
    }
}

// =============================================================================
// Result Type Aliases
// =============================================================================

/// Result type for storage operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Result type for request handlers.
pub type ServerResult<T> = Result<T, ServerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_name_is_bad_request() {
        let err: ServerError = StoreError::MissingFileName.into();
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(err.to_string(), "File name not provided");
    }

    #[test]
    fn test_too_large_maps_to_413() {
        let err: ServerError = StoreError::TooLarge.into();
        assert_eq!(err.status(), StatusCode::PAYLOAD_TOO_LARGE);
    }

    #[test]
    fn test_io_failures_are_internal() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err: ServerError = StoreError::Create(io).into();
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(err.to_string().contains("denied"));
    }
}
