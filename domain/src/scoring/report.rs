//! Scoring of a finished questionnaire and the ticket report text

use super::catalog::TierLevel;
use super::tier::ScoreTier;
use crate::core::string::emphasize_title;
use crate::session::answer::SessionAnswer;

/// Affirmative answers and the tier they map to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Score {
    pub yes_count: usize,
    pub tier: ScoreTier,
    /// Questions answered "yes", in submission order
    pub triggered: Vec<String>,
}

/// Outcome of scoring a session
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScoreResult {
    /// Every answer was "no"; no ticket is opened
    NoFindings,
    Scored(Score),
}

impl ScoreResult {
    /// Score a session: count the "yes" answers and map the count to a tier.
    pub fn from_answers(answers: &[SessionAnswer]) -> Self {
        let triggered: Vec<String> = answers
            .iter()
            .filter(|a| a.answer.is_yes())
            .map(|a| a.question.clone())
            .collect();

        match ScoreTier::for_yes_count(triggered.len()) {
            None => ScoreResult::NoFindings,
            Some(tier) => ScoreResult::Scored(Score {
                yes_count: triggered.len(),
                tier,
                triggered,
            }),
        }
    }

    pub fn is_no_findings(&self) -> bool {
        matches!(self, ScoreResult::NoFindings)
    }
}

/// Formatted ticket text for a scored session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoreReport {
    /// Ticket summary (the tier description)
    pub title: String,
    /// Multi-paragraph chat-markup body
    pub body: String,
}

impl ScoreReport {
    /// Build the report: total score, triggered questions, tier description
    /// and tier details, one blank line between sections.
    pub fn new(score: &Score, level: &TierLevel) -> Self {
        let questions: Vec<String> = score
            .triggered
            .iter()
            .map(|q| emphasize_title(q))
            .collect();

        let body = format!(
            "*Total Score*: {}\n\n*Selected Answers*:\n\n{}\n\n*Result*: {}\n\n{}",
            score.yes_count,
            questions.join("\n"),
            level.description,
            level.details.join("\n"),
        );

        Self {
            title: level.description.clone(),
            body,
        }
    }
}
