//! Error types for the market dashboard

use thiserror::Error;

/// Errors that can occur when fetching from the market-data API
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FetchError {
    /// Transport failed (offline, DNS, connection refused, timeout)
    #[error("Network error: {0}")]
    NetworkError(String),

    /// The API answered with a non-success status
    #[error("API error: HTTP {status}")]
    ApiError { status: u16 },

    /// The body could not be decoded
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// The request was superseded; never shown to the user
    #[error("Request canceled")]
    Canceled,
}

impl FetchError {
    /// Creates an InvalidResponse error
    pub fn invalid_response(msg: impl Into<String>) -> Self {
        Self::InvalidResponse(msg.into())
    }

    /// Returns true for the superseded-request outcome
    pub fn is_canceled(&self) -> bool {
        matches!(self, Self::Canceled)
    }
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        match err.status() {
            Some(status) => Self::ApiError {
                status: status.as_u16(),
            },
            None if err.is_decode() => Self::InvalidResponse(err.to_string()),
            None => Self::NetworkError(err.to_string()),
        }
    }
}
