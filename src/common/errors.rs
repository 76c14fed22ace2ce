//! Error types for the application

use thiserror::Error;

use super::types::WatchId;

/// Result type alias using our ClientError
pub type Result<T> = std::result::Result<T, ClientError>;

/// Main error type for client and watch operations
#[derive(Error, Debug)]
pub enum ClientError {
    /// HTTP request errors
    #[error("HTTP request error: {0}")]
    HttpRequest(#[from] reqwest::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON parsing error: {0}")]
    JsonParse(#[from] serde_json::Error),

    /// Invalid API response (non-success status or an exchange-reported error)
    #[error("Invalid API response: {0}")]
    InvalidResponse(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Deleting a watch that was never registered or has already fired
    #[error("Watch with id={0} doesn't exist")]
    WatchNotFound(WatchId),

    /// Notification delivery errors
    #[error("Notification error: {0}")]
    Notification(String),

    /// Unparseable chat command
    #[error("Invalid command: {0}")]
    InvalidCommand(String),

    /// Timeout errors
    #[error("Operation timed out: {0}")]
    Timeout(String),

    /// Generic internal errors
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ClientError {
    /// Whether the error comes from the data source and should only skip a cycle
    pub fn is_transient(&self) -> bool {
        match self {
            ClientError::HttpRequest(_)
            | ClientError::InvalidResponse(_)
            | ClientError::JsonParse(_)
            | ClientError::Timeout(_) => true,
            _ => false,
        }
    }
}
