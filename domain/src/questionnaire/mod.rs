//! Questionnaire domain.
//!
//! - [`entry::QuestionEntry`]: a single yes/no checklist item with positional ids
//! - [`list::QuestionList`]: the divider-sectioned list and its add/delete/renumber rules

pub mod entry;
pub mod list;
