//! Error types for the NEO Watch SDK

use thiserror::Error;

/// Result type for SDK operations
pub type Result<T> = std::result::Result<T, WatchError>;

/// SDK error types
#[derive(Error, Debug, Clone, PartialEq)]
pub enum WatchError {
    /// Record not found
    #[error("Record not found: {0}")]
    NotFound(String),

    /// Network error (store unreachable, timeout)
    #[error("Network error: {0}")]
    Network(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Record store rejected the request
    #[error("Store error: {0}")]
    Store(String),

    /// Action requires a signed-in member
    #[error("Sign in required: {0}")]
    Unauthenticated(String),

    /// Input rejected before reaching the store
    #[error("Validation error: {0}")]
    Validation(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Failure injected by a test double
    #[error("Injected failure: {0}")]
    Injected(String),
}

impl WatchError {
    /// Whether this failure means the store could not be reached at all.
    ///
    /// Views turn these into a banner instead of a per-item notice.
    pub fn is_transport(&self) -> bool {
        matches!(self, WatchError::Network(_))
    }
}

#[cfg(feature = "client")]
impl From<record_store_client::StoreError> for WatchError {
    fn from(err: record_store_client::StoreError) -> Self {
        use record_store_client::StoreError;

        match err {
            StoreError::NotFound(what) => WatchError::NotFound(what),
            StoreError::Json(e) => WatchError::Serialization(e.to_string()),
            ref e if e.is_transport() => WatchError::Network(e.to_string()),
            other => WatchError::Store(other.to_string()),
        }
    }
}

impl From<serde_json::Error> for WatchError {
    fn from(err: serde_json::Error) -> Self {
        WatchError::Serialization(err.to_string())
    }
}

impl From<toml::de::Error> for WatchError {
    fn from(err: toml::de::Error) -> Self {
        WatchError::Config(err.to_string())
    }
}

impl From<std::io::Error> for WatchError {
    fn from(err: std::io::Error) -> Self {
        WatchError::Config(err.to_string())
    }
}
