//! Domain error types

use thiserror::Error;

/// Domain-level errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// User input that cannot be applied (empty question text, bad answer value).
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid tier: {0} (expected 1-5)")]
    InvalidTier(u8),

    #[error("Tier level missing from catalog: {0}")]
    MissingTierLevel(String),

    #[error("Unsupported questionnaire block: {0}")]
    UnsupportedBlock(String),
}

impl DomainError {
    /// Check if this error is a recoverable user-input problem
    pub fn is_validation(&self) -> bool {
        matches!(self, DomainError::Validation(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error_display() {
        let error = DomainError::Validation("no questions".to_string());
        assert_eq!(error.to_string(), "Validation error: no questions");
    }

    #[test]
    fn test_is_validation_check() {
        assert!(DomainError::Validation("x".to_string()).is_validation());
        assert!(!DomainError::InvalidTier(9).is_validation());
        assert!(!DomainError::MissingTierLevel("level_2".to_string()).is_validation());
    }
}
