//! Error types for fetching scheduler resources.

use thiserror::Error;

/// Errors that can occur while fetching a resource or calling the API.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    /// Request timeout
    #[error("request timeout after {0}s")]
    Timeout(u64),

    /// Connection failed
    #[error("connection failed: {0}")]
    ConnectionFailed(String),

    /// Non-success HTTP status
    #[error("HTTP error: {0}")]
    HttpError(u16),

    /// Invalid response body
    #[error("invalid response: {0}")]
    ParseError(String),
}

impl FetchError {
    /// Classify a reqwest error.
    pub fn from_reqwest(e: reqwest::Error, timeout_seconds: u64) -> Self {
        if e.is_timeout() {
            FetchError::Timeout(timeout_seconds)
        } else if e.is_decode() {
            FetchError::ParseError(e.to_string())
        } else if let Some(status) = e.status() {
            FetchError::HttpError(status.as_u16())
        } else {
            FetchError::ConnectionFailed(e.to_string())
        }
    }
}
