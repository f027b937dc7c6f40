//! Error types for the Slack adapter

use thiserror::Error;
use triage_application::ChatError;

/// Errors that can occur when calling the Slack Web API
#[derive(Error, Debug)]
pub enum SlackError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Slack API error: {0}")]
    Api(String),
}

impl From<SlackError> for ChatError {
    fn from(e: SlackError) -> Self {
        match e {
            SlackError::Http(e) => ChatError::ConnectionError(e.to_string()),
            SlackError::Api(message) => ChatError::Api(message),
        }
    }
}
