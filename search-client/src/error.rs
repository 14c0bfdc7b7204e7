//! Error types for search-client

use thiserror::Error;

/// Result type alias for search operations
pub type Result<T> = std::result::Result<T, SearchError>;

/// Search client error types
#[derive(Error, Debug)]
pub enum SearchError {
    /// The endpoint answered with a non-success status
    #[error("S3 search failed: {status} {body}")]
    RequestFailed { status: u16, body: String },

    /// The request never completed (connect, DNS, cancellation, ...)
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Success status but the body is not a result array
    #[error("Invalid response body: {0}")]
    Decode(#[source] serde_json::Error),

    /// Malformed `s3://bucket/prefix` location
    #[error("Invalid S3 URI: {0}")]
    InvalidLocation(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl SearchError {
    /// HTTP status carried by the error, if the server was reached
    pub fn status(&self) -> Option<u16> {
        match self {
            SearchError::RequestFailed { status, .. } => Some(*status),
            _ => None,
        }
    }
}
