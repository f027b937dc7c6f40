//! Message blocks and modal views the bot builds or patches
//!
//! Templates from the shared folder are opaque; the bot only writes at known
//! paths (the connect button URL) and builds the deletion modal itself.

use serde_json::{Value, json};
use triage_application::DeletionEntry;
use triage_domain::numeric_suffix;

/// Fallback text of the home message
pub const WELCOME_TEXT: &str =
    "Hey there 👋 I'm Chatbot. I'm here to help you create tickets on Jira through Slack.";

pub const ADD_QUESTION_SHORTCUT: &str = "add_question";
pub const DELETE_QUESTION_SHORTCUT: &str = "delete_question";
pub const QUESTIONS_SHORTCUT: &str = "questions";

pub const ADD_QUESTION_CALLBACK: &str = "add_question_modal";
pub const DELETE_QUESTION_CALLBACK: &str = "delete_question_modal";

/// Block and action ids of the add-questions text input
pub const NEW_QUESTIONS_BLOCK: &str = "new_questions_input";
pub const NEW_QUESTIONS_ACTION: &str = "new_questions_text";

/// Action id of the "connect to Jira" button
pub const CONNECT_ACTION: &str = "button-action";

pub const DELETE_CHECKBOX_PREFIX: &str = "delete_question_checkbox_";

/// The `blocks` array of a message template
pub fn template_blocks(template: &Value) -> Value {
    template.get("blocks").cloned().unwrap_or_else(|| json!([]))
}

/// Point the last block's accessory button at `url`.
///
/// Returns false when the last block has no accessory to patch.
pub fn inject_connect_url(blocks: &mut Value, url: &str) -> bool {
    let Some(accessory) = blocks
        .as_array_mut()
        .and_then(|blocks| blocks.last_mut())
        .and_then(|block| block.get_mut("accessory"))
        .and_then(Value::as_object_mut)
    else {
        return false;
    };
    accessory.insert("url".to_string(), Value::String(url.to_string()));
    true
}

/// Modal with one checkbox per question; each block id is the question's block id
pub fn delete_questions_view(entries: impl IntoIterator<Item = DeletionEntry>) -> Value {
    let blocks: Vec<Value> = entries
        .into_iter()
        .enumerate()
        .map(|(position, entry)| {
            let n = numeric_suffix(&entry.block_id).unwrap_or(position + 1);
            json!({
                "block_id": entry.block_id,
                "type": "section",
                "text": {"type": "mrkdwn", "text": " "},
                "accessory": {
                    "type": "checkboxes",
                    "options": [{
                        "text": {"type": "mrkdwn", "text": entry.label},
                        "value": entry.block_id,
                    }],
                    "action_id": format!("{}{}", DELETE_CHECKBOX_PREFIX, n),
                },
            })
        })
        .collect();

    json!({
        "callback_id": DELETE_QUESTION_CALLBACK,
        "title": {"type": "plain_text", "text": "Delete Questions", "emoji": true},
        "submit": {"type": "plain_text", "text": "Delete", "emoji": true},
        "type": "modal",
        "close": {"type": "plain_text", "text": "Cancel", "emoji": true},
        "blocks": blocks,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inject_connect_url_into_last_block() {
        let mut blocks = json!([
            {"type": "section", "text": {"type": "mrkdwn", "text": "Welcome"}},
            {"type": "section", "text": {"type": "mrkdwn", "text": "Connect"},
             "accessory": {"type": "button", "action_id": "button-action", "url": ""}}
        ]);

        assert!(inject_connect_url(&mut blocks, "https://auth.example/authorize?state=s"));
        assert_eq!(blocks[1]["accessory"]["url"], "https://auth.example/authorize?state=s");
        assert!(blocks[0].get("accessory").is_none());
    }

    #[test]
    fn test_inject_connect_url_without_accessory() {
        let mut blocks = json!([{"type": "divider"}]);
        assert!(!inject_connect_url(&mut blocks, "u"));
        assert!(!inject_connect_url(&mut json!([]), "u"));
    }

    #[test]
    fn test_delete_questions_view() {
        let view = delete_questions_view(vec![
            DeletionEntry {
                label: "Auth: login fails".to_string(),
                block_id: "validation_input_1".to_string(),
            },
            DeletionEntry {
                label: "Data: rows lost".to_string(),
                block_id: "validation_input_2".to_string(),
            },
        ]);

        assert_eq!(view["callback_id"], DELETE_QUESTION_CALLBACK);
        let blocks = view["blocks"].as_array().unwrap();
        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[1]["block_id"], "validation_input_2");
        assert_eq!(blocks[1]["accessory"]["action_id"], "delete_question_checkbox_2");
        assert_eq!(blocks[1]["accessory"]["options"][0]["text"]["text"], "Data: rows lost");
    }
}
