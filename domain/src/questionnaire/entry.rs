//! Question entry value object

use serde::{Deserialize, Serialize};

/// Block id stem of a questionnaire input (`validation_input_{n}`)
pub const BLOCK_ID_PREFIX: &str = "validation_input";

/// Action id stem of a questionnaire radio group (`validation_radio_action_{n}`)
pub const ACTION_ID_PREFIX: &str = "validation_radio_action";

/// One yes/no checklist item (Value Object)
///
/// Identity is positional: `block_id` and `action_id` end in the 1-based
/// position of the entry among all questions and are rewritten on every
/// renumber. A reference to an id taken before a renumber is stale afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionEntry {
    label: String,
    block_id: String,
    action_id: String,
}

impl QuestionEntry {
    /// Create an entry numbered `index` with the standard id stems
    pub fn new(label: impl Into<String>, index: usize) -> Self {
        Self {
            label: label.into(),
            block_id: format!("{}_{}", BLOCK_ID_PREFIX, index),
            action_id: format!("{}_{}", ACTION_ID_PREFIX, index),
        }
    }

    /// Rebuild an entry from a stored document, keeping its ids verbatim
    pub fn from_parts(
        label: impl Into<String>,
        block_id: impl Into<String>,
        action_id: impl Into<String>,
    ) -> Self {
        Self {
            label: label.into(),
            block_id: block_id.into(),
            action_id: action_id.into(),
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn block_id(&self) -> &str {
        &self.block_id
    }

    pub fn action_id(&self) -> &str {
        &self.action_id
    }

    /// Position encoded in the block id suffix, if any
    pub fn index(&self) -> Option<usize> {
        numeric_suffix(&self.block_id)
    }

    /// Rewrite the trailing number of both ids to `index`
    pub fn renumber(&mut self, index: usize) {
        self.block_id = with_numeric_suffix(&self.block_id, index);
        self.action_id = with_numeric_suffix(&self.action_id, index);
    }
}

/// Replace the trailing digits of `id` with `index`.
///
/// Everything before the digits is left untouched. An id without trailing
/// digits gets `_<index>` appended, unless it already ends in `_`.
pub fn with_numeric_suffix(id: &str, index: usize) -> String {
    let stem = id.trim_end_matches(|c: char| c.is_ascii_digit());
    if stem.len() < id.len() || stem.ends_with('_') {
        format!("{}{}", stem, index)
    } else {
        format!("{}_{}", id, index)
    }
}

/// Parse the trailing `_<digits>` of an id
pub fn numeric_suffix(id: &str) -> Option<usize> {
    let (_, digits) = id.rsplit_once('_')?;
    digits.parse().ok()
}
