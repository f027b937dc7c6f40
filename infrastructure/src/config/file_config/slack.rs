//! Chat platform configuration from TOML (`[slack]` section)

use serde::{Deserialize, Serialize};
use triage_application::DEFAULT_AUDIT_CHANNEL;

/// Raw Slack configuration from TOML
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileSlackConfig {
    /// Bot token (`xoxb-...`) for Web API calls
    pub bot_token: Option<String>,
    /// Signing secret for verifying inbound requests
    pub signing_secret: Option<String>,
    /// Web API base URL
    pub api_base: String,
    /// Channel notified when a questionnaire has no findings
    pub audit_channel: String,
    /// How long the connect button waits for the OAuth callback (None = forever)
    pub connect_timeout_seconds: Option<u64>,
}

impl Default for FileSlackConfig {
    fn default() -> Self {
        Self {
            bot_token: None,
            signing_secret: None,
            api_base: "https://slack.com/api".to_string(),
            audit_channel: DEFAULT_AUDIT_CHANNEL.to_string(),
            connect_timeout_seconds: Some(600),
        }
    }
}
