//! Error types for the record store client

use thiserror::Error;

/// Record store client error
#[derive(Debug, Error)]
pub enum StoreError {
    /// HTTP request failed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization/deserialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Server returned an error
    #[error("Server error {status}: {message}")]
    Server { status: u16, message: String },

    /// Record or collection not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Invalid response from server
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

impl StoreError {
    /// True when the request never produced an HTTP response
    /// (connection refused, DNS failure, timeout).
    pub fn is_transport(&self) -> bool {
        match self {
            StoreError::Http(e) => e.is_connect() || e.is_timeout() || e.is_request(),
            _ => false,
        }
    }
}

/// Result type for record store operations
pub type Result<T> = std::result::Result<T, StoreError>;
