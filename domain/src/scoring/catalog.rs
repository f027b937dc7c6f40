//! Tier descriptions loaded from the `question_levels` document

use super::tier::ScoreTier;
use crate::core::error::DomainError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Fixed description and detail lines of one tier
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TierLevel {
    pub description: String,
    #[serde(default)]
    pub details: Vec<String>,
}

/// Static configuration keyed `level_1` .. `level_5`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TierCatalog {
    levels: BTreeMap<String, TierLevel>,
}

impl TierCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_level(mut self, tier: ScoreTier, level: TierLevel) -> Self {
        self.levels.insert(tier.catalog_key(), level);
        self
    }

    pub fn level(&self, tier: ScoreTier) -> Result<&TierLevel, DomainError> {
        let key = tier.catalog_key();
        self.levels
            .get(&key)
            .ok_or(DomainError::MissingTierLevel(key))
    }

    /// Check that every tier has an entry
    pub fn validate(&self) -> Result<(), DomainError> {
        for tier in ScoreTier::all() {
            self.level(tier)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_levels_document() {
        let json = r#"{
            "level_1": {"description": "Low", "details": ["Monitor"]},
            "level_2": {"description": "Moderate", "details": []},
            "level_3": {"description": "High", "details": ["Escalate", "Page"]},
            "level_4": {"description": "Severe"},
            "level_5": {"description": "Critical", "details": ["All hands"]}
        }"#;
        let catalog: TierCatalog = serde_json::from_str(json).unwrap();
        assert!(catalog.validate().is_ok());

        let high = catalog.level(ScoreTier::new(3).unwrap()).unwrap();
        assert_eq!(high.description, "High");
        assert_eq!(high.details, vec!["Escalate", "Page"]);
        assert!(catalog.level(ScoreTier::new(4).unwrap()).unwrap().details.is_empty());
    }

    #[test]
    fn test_validate_reports_missing_level() {
        let catalog = TierCatalog::new().with_level(
            ScoreTier::new(1).unwrap(),
            TierLevel {
                description: "Low".to_string(),
                details: vec![],
            },
        );
        assert_eq!(
            catalog.validate(),
            Err(DomainError::MissingTierLevel("level_2".to_string()))
        );
    }
}
