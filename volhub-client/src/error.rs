//! Client error types

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid init data: {0}")]
    InvalidInitData(String),

    #[error("Validation failed")]
    Validation,
}

/// Result type for client operations
pub type Result<T> = std::result::Result<T, ClientError>;
