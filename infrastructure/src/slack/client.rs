//! Slack Web API client
//!
//! Only the two methods the bot calls: `chat.postMessage` and `views.open`.
//! The bot token is passed only to `bearer_auth()`.

use super::error::SlackError;
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::{Value, json};
use triage_application::{ChatError, ChatGateway, ChatMessage};

/// Common envelope of every Web API response
#[derive(Debug, Deserialize)]
struct ApiResponse {
    ok: bool,
    #[serde(default)]
    error: Option<String>,
}

/// Slack Web API client
pub struct SlackClient {
    client: Client,
    api_base: String,
    bot_token: String,
}

impl SlackClient {
    pub fn new(api_base: impl Into<String>, bot_token: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_base: api_base.into(),
            bot_token: bot_token.into(),
        }
    }

    async fn call(&self, method: &str, body: &Value) -> Result<(), SlackError> {
        let url = format!("{}/{}", self.api_base.trim_end_matches('/'), method);
        let response: ApiResponse = self
            .client
            .post(&url)
            .bearer_auth(&self.bot_token)
            .json(body)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        if response.ok {
            Ok(())
        } else {
            Err(SlackError::Api(format!(
                "{} failed: {}",
                method,
                response.error.as_deref().unwrap_or("unknown_error")
            )))
        }
    }
}

#[async_trait]
impl ChatGateway for SlackClient {
    async fn post_message(&self, channel: &str, message: &ChatMessage) -> Result<(), ChatError> {
        let mut body = json!({
            "channel": channel,
            "text": message.text,
        });
        if let Some(blocks) = &message.blocks {
            body["blocks"] = blocks.clone();
        }
        Ok(self.call("chat.postMessage", &body).await?)
    }

    async fn open_view(&self, trigger_id: &str, view: &Value) -> Result<(), ChatError> {
        let body = json!({
            "trigger_id": trigger_id,
            "view": view,
        });
        Ok(self.call("views.open", &body).await?)
    }
}
