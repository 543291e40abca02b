//! Analytics client error types

use thiserror::Error;

/// Errors from fetching analytics.
///
/// The dashboard treats every variant the same way; the split only
/// exists for logs.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    /// Network failure, timeout, or a non-success HTTP status
    #[error("Transport error: {0}")]
    Transport(String),

    /// Body was not JSON or did not have the expected shape
    #[error("Decode error: {0}")]
    Decode(String),
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            FetchError::Decode(err.to_string())
        } else {
            FetchError::Transport(err.to_string())
        }
    }
}

impl From<serde_json::Error> for FetchError {
    fn from(err: serde_json::Error) -> Self {
        FetchError::Decode(err.to_string())
    }
}

/// Errors from the feedback submission endpoints
#[derive(Error, Debug)]
pub enum FeedbackError {
    /// Input rejected before any request was made
    #[error("Validation error: {0}")]
    Validation(String),

    /// The service answered with a non-success status
    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    /// Transport or decode failure
    #[error(transparent)]
    Fetch(#[from] FetchError),
}

impl From<reqwest::Error> for FeedbackError {
    fn from(err: reqwest::Error) -> Self {
        FeedbackError::Fetch(err.into())
    }
}
