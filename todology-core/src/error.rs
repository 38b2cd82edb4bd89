//! Error types for todology.

use thiserror::Error;

/// Errors that can occur while importing assignments.
#[derive(Error, Debug)]
pub enum TodologyError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("ICS parse error: {0}")]
    FeedParse(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    /// A login fault that is worth retrying (server hiccup, garbled response).
    #[error("Transient authentication error: {0}")]
    TransientAuth(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Unable to log in to Todoist after {0} attempts. Please try again.")]
    LoginExhausted(u32),

    #[error("Backend error: {0}")]
    Backend(String),
}

/// Result type alias for todology operations.
pub type TodologyResult<T> = Result<T, TodologyError>;
