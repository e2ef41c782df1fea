//! Error types for adapters.

use thiserror::Error;

/// Errors that can occur when querying the log-search backend.
#[derive(Debug, Error)]
pub enum AdapterError {
    /// HTTP request failed.
    #[error("HTTP request failed: {0}")]
    Http(String),

    /// Failed to parse response.
    #[error("Failed to parse response: {0}")]
    Parse(String),

    /// Authentication failed.
    #[error("Authentication failed: {0}")]
    Auth(String),

    /// The backend rejected the query parameters (HTTP 400).
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Nothing matched the query (HTTP 404).
    #[error("Not found: {0}")]
    NotFound(String),

    /// Connection failed.
    #[error("Connection failed: {0}")]
    Connection(String),

    /// Timeout waiting for response.
    #[error("Request timed out")]
    Timeout,
}

impl AdapterError {
    /// Whether a retry could plausibly succeed.
    ///
    /// Rejections from the backend (bad credentials, bad query, no match)
    /// and unparseable payloads are permanent.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            AdapterError::Http(_) | AdapterError::Connection(_) | AdapterError::Timeout
        )
    }
}

#[cfg(feature = "http")]
impl From<reqwest::Error> for AdapterError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            AdapterError::Timeout
        } else if err.is_connect() {
            AdapterError::Connection(err.to_string())
        } else {
            AdapterError::Http(err.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn permanent_errors_are_not_retried() {
        assert!(AdapterError::Timeout.is_retryable());
        assert!(AdapterError::Connection("refused".into()).is_retryable());
        assert!(AdapterError::Http("502".into()).is_retryable());
        assert!(!AdapterError::Auth("401".into()).is_retryable());
        assert!(!AdapterError::NotFound("tx".into()).is_retryable());
        assert!(!AdapterError::InvalidRequest("id".into()).is_retryable());
        assert!(!AdapterError::Parse("eof".into()).is_retryable());
    }
}
