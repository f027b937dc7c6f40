//! Questionnaire answers

use crate::core::error::DomainError;
use serde::{Deserialize, Serialize};

/// A yes/no radio choice
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Answer {
    Yes,
    No,
}

impl Answer {
    pub fn is_yes(&self) -> bool {
        matches!(self, Answer::Yes)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Answer::Yes => "yes",
            Answer::No => "no",
        }
    }
}

impl std::fmt::Display for Answer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Answer {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "yes" => Ok(Answer::Yes),
            "no" => Ok(Answer::No),
            other => Err(DomainError::Validation(format!(
                "unknown answer '{}', expected yes or no",
                other
            ))),
        }
    }
}

/// A question and the answer a user gave to it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionAnswer {
    pub question: String,
    pub answer: Answer,
}

impl SessionAnswer {
    pub fn new(question: impl Into<String>, answer: Answer) -> Self {
        Self {
            question: question.into(),
            answer,
        }
    }

    pub fn yes(question: impl Into<String>) -> Self {
        Self::new(question, Answer::Yes)
    }

    pub fn no(question: impl Into<String>) -> Self {
        Self::new(question, Answer::No)
    }
}
