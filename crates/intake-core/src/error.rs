//! Error types for the intake workflow
//!
//! Validation failures are deliberately absent from this enum: an invalid
//! draft is an ordinary outcome of a submission attempt
//! ([`crate::SubmitOutcome::Invalid`]) and never reaches the network.

use thiserror::Error;

/// Result type alias for intake operations
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for the intake workflow
#[derive(Error, Debug)]
pub enum Error {
    /// The record store rejected a request or could not be reached
    #[error("Transport error: {0}")]
    Transport(String),

    /// The third-party CRM integration failed
    #[error("Integration error: {0}")]
    Integration(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// HTTP client errors that are not tied to a specific remote call
    #[error("HTTP error: {0}")]
    Http(String),

    /// Record not found
    #[error("Record not found: {0}")]
    NotFound(String),
}

impl Error {
    /// Create a transport error
    pub fn transport(msg: impl Into<String>) -> Self {
        Self::Transport(msg.into())
    }

    /// Create an integration error
    pub fn integration(msg: impl Into<String>) -> Self {
        Self::Integration(msg.into())
    }

    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create an HTTP error
    pub fn http(msg: impl Into<String>) -> Self {
        Self::Http(msg.into())
    }

    /// Create a "not found" error
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    /// Whether the user can simply try the same action again
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Transport(_) | Self::Integration(_) | Self::Http(_))
    }
}
