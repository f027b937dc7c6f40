//! The live questionnaire stored as a chat modal view (`model_data.json`)
//!
//! The document is the exact view opened for users: dividers alternate with
//! `input` blocks holding a yes/no radio group. Everything outside `blocks`
//! (title, submit label, callback id) is kept as found.

use super::shared_folder::{SharedFolder, documents};
use serde_json::{Map, Value, json};
use std::sync::Mutex;
use tracing::debug;
use triage_application::{QuestionnaireRepository, StoreError};
use triage_domain::{DomainError, QuestionEntry, QuestionItem, QuestionList};

/// Callback id the questionnaire view is submitted under
pub const QUESTIONNAIRE_CALLBACK_ID: &str = "questionnaire_modal";

/// View fields used when no document exists yet
fn default_shell() -> Map<String, Value> {
    let shell = json!({
        "type": "modal",
        "callback_id": QUESTIONNAIRE_CALLBACK_ID,
        "title": {"type": "plain_text", "text": "Questionnaire", "emoji": true},
        "submit": {"type": "plain_text", "text": "Submit", "emoji": true},
        "close": {"type": "plain_text", "text": "Cancel", "emoji": true},
    });
    match shell {
        Value::Object(map) => map,
        _ => Map::new(),
    }
}

/// Decode view blocks into a question list
pub fn decode_blocks(blocks: &[Value]) -> Result<QuestionList, DomainError> {
    blocks
        .iter()
        .map(|block| {
            let kind = block.get("type").and_then(Value::as_str).unwrap_or_default();
            if kind == "divider" {
                return Ok(QuestionItem::Divider);
            }
            let label = block.pointer("/label/text").and_then(Value::as_str);
            let block_id = block.get("block_id").and_then(Value::as_str);
            let action_id = block.pointer("/element/action_id").and_then(Value::as_str);
            match (kind, label, block_id, action_id) {
                ("input", Some(label), Some(block_id), Some(action_id)) => Ok(
                    QuestionItem::Question(QuestionEntry::from_parts(label, block_id, action_id)),
                ),
                _ => Err(DomainError::UnsupportedBlock(kind.to_string())),
            }
        })
        .collect::<Result<Vec<_>, _>>()
        .map(QuestionList::from_items)
}

/// Encode a question list as view blocks
pub fn encode_blocks(list: &QuestionList) -> Vec<Value> {
    list.items()
        .iter()
        .map(|item| match item {
            QuestionItem::Divider => json!({"type": "divider"}),
            QuestionItem::Question(entry) => json!({
                "type": "input",
                "block_id": entry.block_id(),
                "element": {
                    "type": "radio_buttons",
                    "options": [
                        {"text": {"type": "plain_text", "text": "Yes", "emoji": true}, "value": "yes"},
                        {"text": {"type": "plain_text", "text": "No", "emoji": true}, "value": "no"},
                    ],
                    "action_id": entry.action_id(),
                },
                "label": {"type": "plain_text", "text": entry.label(), "emoji": true},
            }),
        })
        .collect()
}

/// Questionnaire repository over `model_data.json`
pub struct ViewQuestionnaireRepository {
    folder: SharedFolder,
    shell: Mutex<Map<String, Value>>,
}

impl ViewQuestionnaireRepository {
    pub fn new(folder: SharedFolder) -> Self {
        Self {
            folder,
            shell: Mutex::new(default_shell()),
        }
    }

    /// The full modal view for `list`
    pub fn render(&self, list: &QuestionList) -> Value {
        let mut view = self
            .shell
            .lock()
            .map(|shell| shell.clone())
            .unwrap_or_else(|poisoned| poisoned.into_inner().clone());
        view.insert("blocks".to_string(), Value::Array(encode_blocks(list)));
        Value::Object(view)
    }

    fn invalid(reason: impl ToString) -> StoreError {
        StoreError::InvalidDocument {
            document: documents::MODEL_DATA.to_string(),
            reason: reason.to_string(),
        }
    }
}

impl QuestionnaireRepository for ViewQuestionnaireRepository {
    fn load(&self) -> Result<QuestionList, StoreError> {
        let Some(view) = self
            .folder
            .read_optional::<Map<String, Value>>(documents::MODEL_DATA)?
        else {
            debug!("No questionnaire document yet, starting empty");
            return Ok(QuestionList::new());
        };

        let mut shell = view;
        let blocks = match shell.remove("blocks") {
            Some(Value::Array(blocks)) => blocks,
            None => Vec::new(),
            Some(_) => return Err(Self::invalid("`blocks` is not an array")),
        };
        let list = decode_blocks(&blocks).map_err(Self::invalid)?;

        if let Ok(mut current) = self.shell.lock() {
            *current = shell;
        }
        Ok(list)
    }

    fn save(&self, list: &QuestionList) -> Result<(), StoreError> {
        self.folder.write(documents::MODEL_DATA, &self.render(list))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stored_view() -> Value {
        json!({
            "type": "modal",
            "callback_id": "questionnaire_modal",
            "title": {"type": "plain_text", "text": "Release Check"},
            "blocks": [
                {"type": "divider"},
                {
                    "type": "input",
                    "block_id": "validation_input_1",
                    "element": {"type": "radio_buttons", "action_id": "validation_radio_action_1", "options": []},
                    "label": {"type": "plain_text", "text": "Auth: login fails"}
                },
                {"type": "divider"},
                {
                    "type": "input",
                    "block_id": "validation_input_2",
                    "element": {"type": "radio_buttons", "action_id": "validation_radio_action_2", "options": []},
                    "label": {"type": "plain_text", "text": "Data: rows lost"}
                }
            ]
        })
    }

    #[test]
    fn test_load_decodes_dividers_and_questions() {
        let dir = tempfile::tempdir().unwrap();
        let folder = SharedFolder::new(dir.path());
        folder.write(documents::MODEL_DATA, &stored_view()).unwrap();
        let repo = ViewQuestionnaireRepository::new(folder);

        let list = repo.load().unwrap();
        assert_eq!(list.len(), 2);
        assert_eq!(list.divider_count(), 2);
        assert!(list.is_sectioned());
        assert_eq!(
            list.find("validation_input_2").map(|q| q.label()),
            Some("Data: rows lost")
        );
    }

    #[test]
    fn test_save_keeps_view_fields() {
        let dir = tempfile::tempdir().unwrap();
        let folder = SharedFolder::new(dir.path());
        folder.write(documents::MODEL_DATA, &stored_view()).unwrap();
        let repo = ViewQuestionnaireRepository::new(folder.clone());

        let mut list = repo.load().unwrap();
        list.add_questions(["Perf: slow"]);
        repo.save(&list).unwrap();

        let view: Value = folder.read(documents::MODEL_DATA).unwrap();
        assert_eq!(view["title"]["text"], "Release Check");
        assert_eq!(view["blocks"].as_array().unwrap().len(), 6);
        assert_eq!(view["blocks"][5]["block_id"], "validation_input_3");
        assert_eq!(view["blocks"][5]["element"]["action_id"], "validation_radio_action_3");
        assert_eq!(view["blocks"][5]["element"]["options"][0]["value"], "yes");

        let reloaded = ViewQuestionnaireRepository::new(folder).load().unwrap();
        assert_eq!(reloaded, list);
    }

    #[test]
    fn test_missing_document_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let repo = ViewQuestionnaireRepository::new(SharedFolder::new(dir.path()));

        assert!(repo.load().unwrap().is_empty());
        let view = repo.render(&QuestionList::new());
        assert_eq!(view["callback_id"], QUESTIONNAIRE_CALLBACK_ID);
        assert_eq!(view["blocks"], json!([]));
    }

    #[test]
    fn test_unknown_block_is_rejected() {
        let blocks = vec![json!({"type": "section", "text": {"type": "mrkdwn", "text": "hi"}})];
        assert_eq!(
            decode_blocks(&blocks),
            Err(DomainError::UnsupportedBlock("section".to_string()))
        );
    }
}
