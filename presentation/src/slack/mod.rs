//! Slack-facing layer: payload types, block builders and event dispatch

pub mod blocks;
pub mod dispatch;
pub mod payload;

pub use dispatch::{BotServices, BotTemplates, TriageBot};
