//! Presentation layer for triage-bot
//!
//! This crate contains the CLI definition, the HTTP surface (OAuth callback
//! and Slack endpoints) and the dispatch of Slack events into use cases.

pub mod cli;
pub mod server;
pub mod slack;

// Re-export commonly used types
pub use cli::commands::Cli;
pub use server::{AppState, build_router, serve};
pub use slack::{BotServices, BotTemplates, TriageBot};
