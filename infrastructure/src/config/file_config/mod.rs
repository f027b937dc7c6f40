//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! They are deserialized directly and converted to application types at the
//! wiring edge.

mod jira;
mod logging;
mod server;
mod slack;
mod storage;

pub use jira::{FileIssueConfig, FileJiraConfig};
pub use logging::FileLoggingConfig;
pub use server::FileServerConfig;
pub use slack::FileSlackConfig;
pub use storage::FileStorageConfig;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;
use triage_application::WorkflowConfig;

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    Load(#[from] Box<figment::Error>),

    #[error("Missing required setting `{0}`")]
    Missing(&'static str),

    #[error("Invalid setting `{key}`: {reason}")]
    Invalid { key: &'static str, reason: String },
}

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Chat platform settings
    pub slack: FileSlackConfig,
    /// Issue tracker settings
    pub jira: FileJiraConfig,
    /// Shared folder and audit log locations
    pub storage: FileStorageConfig,
    /// HTTP listener settings
    pub server: FileServerConfig,
    /// Log file settings
    pub logging: FileLoggingConfig,
}

impl FileConfig {
    /// Check that every secret needed to serve is present.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let required = [
            ("slack.bot_token", &self.slack.bot_token),
            ("slack.signing_secret", &self.slack.signing_secret),
            ("jira.client_id", &self.jira.client_id),
            ("jira.client_secret", &self.jira.client_secret),
        ];
        for (key, value) in required {
            if value.as_deref().is_none_or(|v| v.trim().is_empty()) {
                return Err(ConfigError::Missing(key));
            }
        }

        if self.server.port == 0 {
            return Err(ConfigError::Invalid {
                key: "server.port",
                reason: "port cannot be 0".to_string(),
            });
        }
        if self.jira.scopes.is_empty() {
            return Err(ConfigError::Invalid {
                key: "jira.scopes",
                reason: "at least one scope is required".to_string(),
            });
        }
        Ok(())
    }

    /// Fill unset secrets from the shared `slack_config.json` document.
    ///
    /// Values from TOML or the environment always win.
    pub fn apply_shared_secrets(&mut self, document: &Map<String, Value>) {
        let fields = [
            (&mut self.slack.bot_token, "SLACK_BOT_TOKEN"),
            (&mut self.slack.signing_secret, "SLACK_SIGNING_SECRET"),
            (&mut self.jira.client_id, "JIRA_CLIENT_ID"),
            (&mut self.jira.client_secret, "JIRA_SECRET_ID"),
        ];
        for (field, key) in fields {
            if field.is_none()
                && let Some(value) = document.get(key).and_then(Value::as_str)
            {
                *field = Some(value.to_string());
            }
        }
    }

    /// Workflow settings for the application layer
    pub fn workflow(&self) -> WorkflowConfig {
        WorkflowConfig {
            audit_channel: self.slack.audit_channel.clone(),
            issue_defaults: self.jira.issue.to_issue_defaults(),
            ..WorkflowConfig::default()
        }
        .with_connect_timeout_seconds(self.slack.connect_timeout_seconds)
    }

    /// The config as TOML with secrets masked
    pub fn to_redacted_toml(&self) -> Result<String, toml::ser::Error> {
        let mut shown = self.clone();
        for secret in [
            &mut shown.slack.bot_token,
            &mut shown.slack.signing_secret,
            &mut shown.jira.client_secret,
        ] {
            if secret.is_some() {
                *secret = Some("<redacted>".to_string());
            }
        }
        toml::to_string_pretty(&shown)
    }
}
