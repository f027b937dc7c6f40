//! Error types for the Jira adapter

use thiserror::Error;
use triage_application::TrackerError;

/// Result type alias for Jira operations
pub type Result<T> = std::result::Result<T, JiraError>;

/// Errors that can occur when talking to Jira Cloud
#[derive(Error, Debug)]
pub enum JiraError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Access token rejected")]
    Unauthorized,

    #[error("Request rejected (status {status}): {message}")]
    Status { status: u16, message: String },

    #[error("Failed to parse response: {0}")]
    ParseError(String),
}

impl From<JiraError> for TrackerError {
    fn from(e: JiraError) -> Self {
        match e {
            JiraError::Unauthorized => TrackerError::Unauthorized,
            JiraError::Status { status, message } => TrackerError::Rejected { status, message },
            JiraError::ParseError(reason) => TrackerError::UnexpectedResponse(reason),
            JiraError::Http(e) => TrackerError::ConnectionError(e.to_string()),
            JiraError::InvalidUrl(url) => TrackerError::ConnectionError(url),
        }
    }
}
