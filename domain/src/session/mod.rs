//! Questionnaire session domain.
//!
//! - [`answer::SessionAnswer`]: one answered question within a submission

pub mod answer;
