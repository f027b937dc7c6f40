//! Ticket entities and the issue-creation payload

use crate::core::string::{strip_emphasis, truncate};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

/// Longest summary the tracker accepts
pub const MAX_SUMMARY_LEN: usize = 255;

/// A ticket the tracker created; owned by the tracker, not persisted here
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TicketRecord {
    pub key: String,
    pub self_url: String,
}

impl TicketRecord {
    pub fn new(key: impl Into<String>, self_url: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            self_url: self_url.into(),
        }
    }
}

/// Fixed metadata attached to every ticket
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssueDefaults {
    pub assignee_id: String,
    pub reporter_id: String,
    pub project_id: String,
    pub issue_type: String,
    pub labels: Vec<String>,
}

impl Default for IssueDefaults {
    fn default() -> Self {
        Self {
            assignee_id: String::new(),
            reporter_id: String::new(),
            project_id: "10000".to_string(),
            issue_type: "Task".to_string(),
            labels: vec!["bugfix".to_string(), "blitz_test".to_string()],
        }
    }
}

/// Summary and body of a ticket about to be filed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssueDraft {
    pub summary: String,
    pub body: String,
}

impl IssueDraft {
    pub fn new(summary: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            summary: summary.into(),
            body: body.into(),
        }
    }

    /// Build the issue-creation request body.
    ///
    /// The description is a document with a single plain-text paragraph;
    /// chat emphasis markers are stripped.
    pub fn to_payload(&self, defaults: &IssueDefaults) -> Value {
        json!({
            "fields": {
                "assignee": { "id": defaults.assignee_id },
                "description": {
                    "type": "doc",
                    "version": 1,
                    "content": [{
                        "type": "paragraph",
                        "content": [{
                            "type": "text",
                            "text": strip_emphasis(&self.body),
                        }],
                    }],
                },
                "issuetype": { "name": defaults.issue_type },
                "labels": defaults.labels,
                "project": { "id": defaults.project_id },
                "reporter": { "id": defaults.reporter_id },
                "summary": truncate(&self.summary, MAX_SUMMARY_LEN),
            },
            "update": {},
        })
    }
}
