//! Error types for the small file server.
//!
//! Defines a unified error type that maps cleanly to HTTP responses.
//! Request errors answer with a plain-text body, matching what cluster
//! nodes already parse; only the method check answers with the JSON
//! result envelope.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::api::types::RestResult;

/// Unified error type for small file operations.
#[derive(Debug, Error)]
pub enum SmallFileError {
    #[error("Missing parameter")]
    MissingParameter,

    #[error("Invalid token")]
    InvalidToken,

    #[error("Invalid file id format: {0}")]
    InvalidFileId(String),

    /// Unknown id and metadata-only record share one message.
    #[error("File not found or is not content")]
    FileNotFound,

    #[error("HTTP method is not allowed.")]
    MethodNotAllowed,

    #[error("File already exists: {0}")]
    DuplicateFile(String),

    #[error("File {name} is {size} bytes, exceeding the limit of {limit} bytes")]
    FileTooLarge { name: String, size: u64, limit: u64 },

    #[error("Registry is full: at most {0} small files may be registered")]
    TooManyFiles(usize),

    #[error("Checksum mismatch for {name}: expected {expected}, got {actual}")]
    ChecksumMismatch {
        name: String,
        expected: String,
        actual: String,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl IntoResponse for SmallFileError {
    fn into_response(self) -> Response {
        match self {
            SmallFileError::MissingParameter
            | SmallFileError::InvalidToken
            | SmallFileError::InvalidFileId(_)
            | SmallFileError::FileNotFound => {
                (StatusCode::BAD_REQUEST, self.to_string()).into_response()
            }
            SmallFileError::MethodNotAllowed => {
                let body = RestResult::failed(self.to_string());
                (StatusCode::METHOD_NOT_ALLOWED, Json(body)).into_response()
            }
            // Registration, I/O and config errors only occur while seeding the
            // registry at startup. Log the detail but don't expose internals.
            SmallFileError::DuplicateFile(_)
            | SmallFileError::FileTooLarge { .. }
            | SmallFileError::TooManyFiles(_)
            | SmallFileError::ChecksumMismatch { .. }
            | SmallFileError::Io(_)
            | SmallFileError::Config(_) => {
                tracing::error!(error = %self, "Internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An internal error occurred".to_string(),
                )
                    .into_response()
            }
        }
    }
}

/// Result type alias for small file operations.
pub type SmallFileResult<T> = Result<T, SmallFileError>;
