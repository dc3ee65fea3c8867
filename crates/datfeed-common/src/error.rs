//! Error types for datfeed

use thiserror::Error;

/// Result type alias for datfeed operations
pub type Result<T> = std::result::Result<T, DatfeedError>;

/// Main error type shared across the workspace
#[derive(Error, Debug)]
pub enum DatfeedError {
    #[error("Invalid URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("HTTP client error: {0}")]
    HttpClient(String),
}

impl DatfeedError {
    /// Create an invalid URL error
    pub fn invalid_url(url: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidUrl {
            url: url.into(),
            reason: reason.into(),
        }
    }
}
