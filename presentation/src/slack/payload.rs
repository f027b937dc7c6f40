//! Slack Events API and interactivity payloads
//!
//! Only the fields the bot reads are modelled; everything else is ignored.

use serde::Deserialize;
use serde_json::Value;
use std::collections::BTreeMap;
use std::str::FromStr;
use tracing::warn;
use triage_domain::Answer;

/// Top-level body of `POST /slack/events`
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EventEnvelope {
    UrlVerification { challenge: String },
    EventCallback { event: Event },
    #[serde(other)]
    Unsupported,
}

/// Inner event of an `event_callback`
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    AppHomeOpened {
        user: String,
    },
    Message {
        #[serde(default)]
        user: Option<String>,
        #[serde(default)]
        text: Option<String>,
        channel: String,
        #[serde(default)]
        bot_id: Option<String>,
        #[serde(default)]
        subtype: Option<String>,
    },
    #[serde(other)]
    Unsupported,
}

/// The user behind an interaction
#[derive(Debug, Clone, Deserialize)]
pub struct SlackUser {
    pub id: String,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
}

impl SlackUser {
    /// Handle used in greetings and ticket logs
    pub fn handle(&self) -> &str {
        self.username
            .as_deref()
            .or(self.name.as_deref())
            .unwrap_or(&self.id)
    }
}

/// JSON carried in the `payload` form field of `POST /slack/interactivity`
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Interaction {
    Shortcut {
        callback_id: String,
        trigger_id: String,
        user: SlackUser,
    },
    ViewSubmission {
        user: SlackUser,
        view: SubmittedView,
    },
    BlockActions {
        user: SlackUser,
        #[serde(default)]
        actions: Vec<BlockAction>,
    },
    #[serde(other)]
    Unsupported,
}

#[derive(Debug, Deserialize)]
pub struct BlockAction {
    pub action_id: String,
}

/// A submitted modal view
#[derive(Debug, Deserialize)]
pub struct SubmittedView {
    pub callback_id: String,
    #[serde(default)]
    pub state: ViewState,
    #[serde(default)]
    pub blocks: Vec<Value>,
}

/// `state.values`: block id → action id → input value
#[derive(Debug, Default, Deserialize)]
pub struct ViewState {
    #[serde(default)]
    pub values: BTreeMap<String, BTreeMap<String, InputValue>>,
}

#[derive(Debug, Default, Deserialize)]
pub struct InputValue {
    #[serde(default)]
    pub value: Option<String>,
    #[serde(default)]
    pub selected_option: Option<SelectedOption>,
    #[serde(default)]
    pub selected_options: Vec<SelectedOption>,
}

#[derive(Debug, Deserialize)]
pub struct SelectedOption {
    pub value: String,
}

impl SubmittedView {
    /// Text typed into a plain-text input
    pub fn text_value(&self, block_id: &str, action_id: &str) -> Option<&str> {
        self.state
            .values
            .get(block_id)?
            .get(action_id)?
            .value
            .as_deref()
    }

    /// Block ids with at least one ticked checkbox
    pub fn checked_blocks(&self) -> impl Iterator<Item = &str> {
        self.state
            .values
            .iter()
            .filter(|(_, actions)| actions.values().any(|v| !v.selected_options.is_empty()))
            .map(|(block_id, _)| block_id.as_str())
    }

    /// `(question label, answer)` for every answered question, in view order
    pub fn answers(&self) -> Vec<(String, Answer)> {
        self.blocks
            .iter()
            .filter_map(|block| {
                let block_id = block.get("block_id")?.as_str()?;
                let label = block.pointer("/label/text")?.as_str()?;
                let action_id = block.pointer("/element/action_id")?.as_str()?;
                let selected = self
                    .state
                    .values
                    .get(block_id)?
                    .get(action_id)?
                    .selected_option
                    .as_ref()?;
                match Answer::from_str(&selected.value) {
                    Ok(answer) => Some((label.to_string(), answer)),
                    Err(e) => {
                        warn!("Ignoring answer for {}: {}", block_id, e);
                        None
                    }
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_url_verification() {
        let envelope: EventEnvelope = serde_json::from_value(json!({
            "type": "url_verification",
            "challenge": "abc",
            "token": "t"
        }))
        .unwrap();
        assert!(matches!(
            envelope,
            EventEnvelope::UrlVerification { challenge } if challenge == "abc"
        ));
    }

    #[test]
    fn test_event_callbacks() {
        let home: EventEnvelope = serde_json::from_value(json!({
            "type": "event_callback",
            "team_id": "T1",
            "event": {"type": "app_home_opened", "user": "U1", "channel": "D1", "tab": "home"}
        }))
        .unwrap();
        assert!(matches!(
            home,
            EventEnvelope::EventCallback { event: Event::AppHomeOpened { user } } if user == "U1"
        ));

        let other: EventEnvelope = serde_json::from_value(json!({
            "type": "event_callback",
            "event": {"type": "reaction_added", "user": "U1"}
        }))
        .unwrap();
        assert!(matches!(
            other,
            EventEnvelope::EventCallback { event: Event::Unsupported }
        ));
    }

    #[test]
    fn test_shortcut_payload() {
        let interaction: Interaction = serde_json::from_value(json!({
            "type": "shortcut",
            "callback_id": "add_question",
            "trigger_id": "trig",
            "user": {"id": "U1", "username": "dana", "team_id": "T1"}
        }))
        .unwrap();
        let Interaction::Shortcut { callback_id, user, .. } = interaction else {
            panic!("expected shortcut");
        };
        assert_eq!(callback_id, "add_question");
        assert_eq!(user.handle(), "dana");
    }

    #[test]
    fn test_questionnaire_answers_follow_view_order() {
        let view: SubmittedView = serde_json::from_value(json!({
            "callback_id": "questionnaire_modal",
            "blocks": [
                {"type": "divider"},
                {"type": "input", "block_id": "validation_input_1",
                 "element": {"type": "radio_buttons", "action_id": "validation_radio_action_1"},
                 "label": {"type": "plain_text", "text": "Auth: login fails"}},
                {"type": "divider"},
                {"type": "input", "block_id": "validation_input_2",
                 "element": {"type": "radio_buttons", "action_id": "validation_radio_action_2"},
                 "label": {"type": "plain_text", "text": "Data: rows lost"}}
            ],
            "state": {"values": {
                "validation_input_2": {"validation_radio_action_2": {"type": "radio_buttons", "selected_option": {"value": "no"}}},
                "validation_input_1": {"validation_radio_action_1": {"type": "radio_buttons", "selected_option": {"value": "yes"}}}
            }}
        }))
        .unwrap();

        assert_eq!(
            view.answers(),
            vec![
                ("Auth: login fails".to_string(), Answer::Yes),
                ("Data: rows lost".to_string(), Answer::No),
            ]
        );
    }

    #[test]
    fn test_checked_blocks_and_text_value() {
        let view: SubmittedView = serde_json::from_value(json!({
            "callback_id": "delete_question_modal",
            "state": {"values": {
                "validation_input_1": {"delete_question_checkbox_1": {"type": "checkboxes", "selected_options": [{"value": "validation_input_1"}]}},
                "validation_input_2": {"delete_question_checkbox_2": {"type": "checkboxes", "selected_options": []}},
                "new_questions_input": {"new_questions_text": {"type": "plain_text_input", "value": "A\nB"}}
            }}
        }))
        .unwrap();

        assert_eq!(view.checked_blocks().collect::<Vec<_>>(), vec!["validation_input_1"]);
        assert_eq!(view.text_value("new_questions_input", "new_questions_text"), Some("A\nB"));
        assert_eq!(view.text_value("new_questions_input", "other"), None);
    }
}
