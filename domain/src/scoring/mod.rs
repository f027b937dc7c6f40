//! Scoring domain.
//!
//! Maps the number of affirmative answers in a session to a severity tier
//! and renders the ticket report.
//!
//! - [`tier::ScoreTier`]: severity level 1..=5
//! - [`catalog::TierCatalog`]: description and details per tier
//! - [`report::ScoreResult`] / [`report::ScoreReport`]: scoring outcome and formatted text

pub mod catalog;
pub mod report;
pub mod tier;

pub use catalog::{TierCatalog, TierLevel};
pub use report::{Score, ScoreReport, ScoreResult};
pub use tier::{MAX_TIER, ScoreTier};
