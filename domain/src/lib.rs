//! Domain layer for triage-bot
//!
//! This crate contains the core business rules, entities, and value objects.
//! It has no dependencies on infrastructure or presentation concerns.
//!
//! # Core Concepts
//!
//! ## Questionnaire
//!
//! A divider-sectioned list of yes/no questions whose block and action ids
//! encode their position. Every add or delete renumbers the whole list.
//!
//! ## Scoring
//!
//! The count of "yes" answers maps to a severity tier (1-5), which selects
//! the description and detail lines of the ticket report.
//!
//! ## Tracker
//!
//! OAuth credentials, the connected site and the tickets filed there.

pub mod core;
pub mod questionnaire;
pub mod scoring;
pub mod session;
pub mod tracker;

// Re-export commonly used types
pub use self::core::{
    error::DomainError,
    string::{emphasize_title, split_title_body, strip_emphasis},
};
pub use questionnaire::{
    entry::{ACTION_ID_PREFIX, BLOCK_ID_PREFIX, QuestionEntry, numeric_suffix},
    list::{DeletionCandidate, DeletionCandidates, PositionedQuestion, QuestionItem, QuestionList},
};
pub use scoring::{Score, ScoreReport, ScoreResult, ScoreTier, TierCatalog, TierLevel};
pub use session::answer::{Answer, SessionAnswer};
pub use tracker::{
    credential::{Credential, OAuthGrant},
    site::SiteInfo,
    ticket::{IssueDefaults, IssueDraft, TicketRecord},
};
