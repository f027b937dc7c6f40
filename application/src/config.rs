//! Application-level configuration.
//!
//! Settings that control how use cases behave, independent of where they
//! were loaded from.

use std::time::Duration;
use triage_domain::IssueDefaults;

/// Channel that receives the "all answers were no" notice when none is configured
pub const DEFAULT_AUDIT_CHANNEL: &str = "C06BJAFU525";

/// Questionnaire and ticket workflow configuration.
#[derive(Debug, Clone)]
pub struct WorkflowConfig {
    /// Channel notified when a questionnaire has no "yes" answers.
    pub audit_channel: String,
    /// Metadata attached to every ticket.
    pub issue_defaults: IssueDefaults,
    /// How long the connect button waits for the OAuth callback.
    /// `None` waits until the connection arrives.
    pub connect_timeout: Option<Duration>,
}

impl Default for WorkflowConfig {
    fn default() -> Self {
        Self {
            audit_channel: DEFAULT_AUDIT_CHANNEL.to_string(),
            issue_defaults: IssueDefaults::default(),
            connect_timeout: Some(Duration::from_secs(600)),
        }
    }
}

impl WorkflowConfig {
    /// Creates a WorkflowConfig from an optional connect timeout in seconds.
    ///
    /// If `seconds` is `None`, the connect button waits indefinitely.
    pub fn with_connect_timeout_seconds(mut self, seconds: Option<u64>) -> Self {
        self.connect_timeout = seconds.map(Duration::from_secs);
        self
    }
}
