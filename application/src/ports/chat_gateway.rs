//! Chat Gateway port
//!
//! The subset of the chat platform the bot calls into: posting messages and
//! opening modal views. Block and view payloads are opaque JSON.

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

/// Errors that can occur while calling the chat platform
#[derive(Error, Debug)]
pub enum ChatError {
    #[error("Connection error: {0}")]
    ConnectionError(String),

    #[error("Platform returned an error: {0}")]
    Api(String),
}

/// A message to post: fallback text plus optional layout blocks
#[derive(Debug, Clone, PartialEq)]
pub struct ChatMessage {
    pub text: String,
    pub blocks: Option<Value>,
}

impl ChatMessage {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            blocks: None,
        }
    }

    pub fn with_blocks(text: impl Into<String>, blocks: Value) -> Self {
        Self {
            text: text.into(),
            blocks: Some(blocks),
        }
    }
}

/// Gateway for chat platform calls
#[async_trait]
pub trait ChatGateway: Send + Sync {
    /// Post a message to a channel (a user id opens a direct message)
    async fn post_message(&self, channel: &str, message: &ChatMessage) -> Result<(), ChatError>;

    /// Open a modal view for an interaction trigger
    async fn open_view(&self, trigger_id: &str, view: &Value) -> Result<(), ChatError>;
}
