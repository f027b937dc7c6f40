//! Jira Cloud adapter
//!
//! Implements the [`TrackerGateway`](triage_application::TrackerGateway) port
//! over the OAuth token endpoint and the REST v3 issue API.

pub mod error;
pub mod gateway;
pub mod types;

pub use error::JiraError;
pub use gateway::{JiraGateway, JiraSettings};
