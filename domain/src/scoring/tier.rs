//! Severity tier value object

use crate::core::error::DomainError;
use serde::{Deserialize, Serialize};

/// Highest severity tier
pub const MAX_TIER: u8 = 5;

/// Severity level 1..=5 derived from the number of "yes" answers
///
/// Every two affirmative answers raise the tier by one, capped at
/// [`MAX_TIER`]: 1-2 → 1, 3-4 → 2, 5-6 → 3, 7-8 → 4, 9+ → 5.
///
/// # Example
///
/// ```
/// use triage_domain::scoring::ScoreTier;
///
/// assert_eq!(ScoreTier::for_yes_count(0), None);
/// assert_eq!(ScoreTier::for_yes_count(3).unwrap().level(), 2);
/// assert_eq!(ScoreTier::for_yes_count(42).unwrap().level(), 5);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct ScoreTier(u8);

impl ScoreTier {
    pub fn new(level: u8) -> Result<Self, DomainError> {
        if (1..=MAX_TIER).contains(&level) {
            Ok(Self(level))
        } else {
            Err(DomainError::InvalidTier(level))
        }
    }

    /// Tier for a count of affirmative answers; `None` when there are none
    pub fn for_yes_count(count: usize) -> Option<Self> {
        if count == 0 {
            return None;
        }
        let level = ((count - 1) / 2 + 1).min(MAX_TIER as usize);
        Some(Self(level as u8))
    }

    pub fn level(&self) -> u8 {
        self.0
    }

    /// Key of this tier in the levels document (`level_1` .. `level_5`)
    pub fn catalog_key(&self) -> String {
        format!("level_{}", self.0)
    }

    pub fn all() -> impl Iterator<Item = ScoreTier> {
        (1..=MAX_TIER).map(ScoreTier)
    }
}

impl TryFrom<u8> for ScoreTier {
    type Error = DomainError;

    fn try_from(level: u8) -> Result<Self, Self::Error> {
        Self::new(level)
    }
}

impl From<ScoreTier> for u8 {
    fn from(tier: ScoreTier) -> Self {
        tier.0
    }
}

impl std::fmt::Display for ScoreTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "tier {}", self.0)
    }
}
