//! Infrastructure layer for triage-bot
//!
//! This crate contains adapters that implement the ports defined
//! in the application layer, including configuration file loading.

pub mod config;
pub mod jira;
pub mod logging;
pub mod slack;
pub mod storage;

// Re-export commonly used types
pub use config::{ConfigError, ConfigLoader, FileConfig};
pub use jira::{JiraError, JiraGateway, JiraSettings};
pub use logging::JsonlTicketAudit;
pub use slack::{SlackClient, SlackError};
pub use storage::{
    JsonCredentialStore, SharedFolder, SlackConfigStore, ViewQuestionnaireRepository, documents,
};
