//! Client error types

use thiserror::Error;

use crate::image::ImageError;

/// Client error type
#[derive(Debug, Error)]
pub enum ClientError {
    /// HTTP request never completed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// In-process transport failed
    #[error("Transport error: {0}")]
    Transport(String),

    /// Server rejected the request with a structured error body
    #[error("API error ({status}): {message}")]
    Api {
        status: u16,
        message: String,
        details: Option<serde_json::Value>,
    },

    /// Server answered 2xx but reported `success: false`
    #[error("Request rejected: {0}")]
    Rejected(String),

    /// Invalid response format
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Authentication required
    #[error("Authentication required")]
    Unauthorized,

    /// Permission denied
    #[error("Permission denied: {0}")]
    Forbidden(String),

    /// Resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Local input rejected before any request was made
    #[error("Validation error: {0}")]
    Validation(#[from] shared::ModelError),

    /// Image could not be prepared
    #[error("Image error: {0}")]
    Image(#[from] ImageError),

    /// Image upload returned no URL
    #[error("Image upload failed")]
    UploadFailed,

    /// Local session storage failed
    #[error("Storage error: {0}")]
    Storage(#[from] std::io::Error),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl ClientError {
    /// The request did not reach the server or its answer was lost.
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Http(_) | Self::Transport(_))
    }
}

/// Result type for client operations
pub type ClientResult<T> = Result<T, ClientError>;
