//! Error types for SafeWatch

use thiserror::Error;

/// Result type alias using SafeWatch's Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for SafeWatch operations
#[derive(Error, Debug)]
pub enum Error {
    /// Malformed or incomplete reading or alert input
    #[error("Validation error: {0}")]
    Validation(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Alert was recorded but could not be delivered to live subscribers
    #[error("Broadcast error: {0}")]
    Broadcast(String),

    /// Redis error
    #[error("Redis error: {0}")]
    Redis(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl Error {
    /// Create a validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Create a broadcast error
    pub fn broadcast(msg: impl Into<String>) -> Self {
        Self::Broadcast(msg.into())
    }

    /// Whether this error was caused by the caller's input
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}

impl From<config::ConfigError> for Error {
    fn from(err: config::ConfigError) -> Self {
        Self::Config(err.to_string())
    }
}
