//! Slack adapter
//!
//! Implements the [`ChatGateway`](triage_application::ChatGateway) port over
//! the Slack Web API.

pub mod client;
pub mod error;

pub use client::SlackClient;
pub use error::SlackError;
