//! Issue tracker configuration from TOML (`[jira]` section)

use serde::{Deserialize, Serialize};
use triage_domain::IssueDefaults;

/// Raw Jira configuration from TOML
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileJiraConfig {
    /// OAuth 2.0 (3LO) client id
    pub client_id: Option<String>,
    /// OAuth 2.0 client secret
    pub client_secret: Option<String>,
    /// Redirect URI registered for the app; must point at the callback route
    pub redirect_uri: String,
    /// Authorization server base (`/authorize`, `/oauth/token`)
    pub auth_base: String,
    /// REST API gateway base (`/oauth/token/accessible-resources`, `/ex/jira/...`)
    pub api_base: String,
    /// Scopes requested on the consent screen
    pub scopes: Vec<String>,
    /// Metadata attached to every ticket
    pub issue: FileIssueConfig,
}

impl Default for FileJiraConfig {
    fn default() -> Self {
        Self {
            client_id: None,
            client_secret: None,
            redirect_uri: "http://localhost:3000/jira/oauth/callback".to_string(),
            auth_base: "https://auth.atlassian.com".to_string(),
            api_base: "https://api.atlassian.com".to_string(),
            scopes: [
                "read:jira-work",
                "read:jira-user",
                "write:jira-work",
                "offline_access",
            ]
            .into_iter()
            .map(String::from)
            .collect(),
            issue: FileIssueConfig::default(),
        }
    }
}

/// Raw ticket metadata (`[jira.issue]` section)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileIssueConfig {
    pub assignee_id: String,
    pub reporter_id: String,
    pub project_id: String,
    pub issue_type: String,
    pub labels: Vec<String>,
}

impl Default for FileIssueConfig {
    fn default() -> Self {
        let defaults = IssueDefaults::default();
        Self {
            assignee_id: defaults.assignee_id,
            reporter_id: defaults.reporter_id,
            project_id: defaults.project_id,
            issue_type: defaults.issue_type,
            labels: defaults.labels,
        }
    }
}

impl FileIssueConfig {
    pub fn to_issue_defaults(&self) -> IssueDefaults {
        IssueDefaults {
            assignee_id: self.assignee_id.clone(),
            reporter_id: self.reporter_id.clone(),
            project_id: self.project_id.clone(),
            issue_type: self.issue_type.clone(),
            labels: self.labels.clone(),
        }
    }
}
