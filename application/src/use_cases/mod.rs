//! Use cases
//!
//! Application-level operations that orchestrate domain logic.

pub mod question_store;
pub mod run_questionnaire;
pub mod session_tracker;
pub mod submit_ticket;
pub mod token_manager;
