//! Error types for the extraction pipeline

use thiserror::Error;

/// Errors that can occur while building queries, fetching or decoding mail
#[derive(Error, Debug)]
pub enum ExtractError {
    /// Card configuration is missing, empty or malformed
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// The mail account session could not be established
    #[error("Authentication failed: {0}")]
    Auth(String),

    /// Search or per-message retrieval failed
    #[error("Failed to fetch {target}: {details}")]
    Fetch { target: String, details: String },

    /// A part's transfer encoding could not be decoded
    #[error("Failed to decode content: {0}")]
    Decode(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ExtractError {
    /// Whether this error aborts the whole run rather than a single message
    #[must_use]
    pub const fn is_fatal(&self) -> bool {
        !matches!(self, Self::Decode(_))
    }
}

/// Result type for extraction operations
pub type Result<T> = std::result::Result<T, ExtractError>;
