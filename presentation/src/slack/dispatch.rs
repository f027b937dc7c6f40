//! Slack event dispatch
//!
//! Routes events and interactions to the question store, the token manager
//! and the questionnaire pipeline, and replies through the chat gateway.
//! Nothing here returns an error: failures are logged and, where a user is
//! waiting, reported back as a message.

use super::blocks::{
    ADD_QUESTION_CALLBACK, ADD_QUESTION_SHORTCUT, CONNECT_ACTION, DELETE_CHECKBOX_PREFIX,
    DELETE_QUESTION_CALLBACK, DELETE_QUESTION_SHORTCUT, NEW_QUESTIONS_ACTION, NEW_QUESTIONS_BLOCK,
    QUESTIONS_SHORTCUT, WELCOME_TEXT, delete_questions_view, inject_connect_url, template_blocks,
};
use super::payload::{Event, Interaction, SlackUser, SubmittedView};
use serde_json::Value;
use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::{debug, error, info, warn};
use triage_application::{
    ChatGateway, ChatMessage, QuestionStore, QuestionStoreError, QuestionnaireOutcome,
    RunQuestionnaireInput, RunQuestionnaireUseCase, SubmitTicketError, TicketSubmitter,
    TokenManager, WorkflowConfig,
};
use triage_infrastructure::ViewQuestionnaireRepository;
use triage_infrastructure::storage::QUESTIONNAIRE_CALLBACK_ID;

/// Static UI templates from the shared folder
#[derive(Debug, Clone)]
pub struct BotTemplates {
    /// Home message once the tracker is connected (`default.json`)
    pub default: Value,
    /// Home message with the connect button (`connection.json`)
    pub connection: Value,
    /// Add-questions modal (`add_questions.json`)
    pub add_questions: Value,
}

/// Services the bot dispatches into
pub struct BotServices {
    pub chat: Arc<dyn ChatGateway>,
    pub questions: Arc<QuestionStore>,
    pub questionnaire: Arc<RunQuestionnaireUseCase>,
    pub tokens: Arc<TokenManager>,
    pub submitter: Arc<TicketSubmitter>,
    pub views: Arc<ViewQuestionnaireRepository>,
}

/// Slack-facing bot
pub struct TriageBot {
    services: BotServices,
    templates: BotTemplates,
    config: WorkflowConfig,
}

impl TriageBot {
    pub fn new(services: BotServices, templates: BotTemplates, config: WorkflowConfig) -> Self {
        Self {
            services,
            templates,
            config,
        }
    }

    pub fn tokens(&self) -> &Arc<TokenManager> {
        &self.services.tokens
    }

    pub async fn handle_event(&self, event: Event) {
        match event {
            Event::AppHomeOpened { user } => self.home_opened(&user).await,
            Event::Message {
                user: Some(user),
                text: Some(text),
                channel,
                bot_id: None,
                subtype: None,
            } => {
                if text.contains("hi") {
                    self.post(&channel, ChatMessage::text(format!("Hi, there <@{}>!", user)))
                        .await;
                }
            }
            Event::Message { .. } => debug!("Ignoring bot or system message"),
            Event::Unsupported => debug!("Ignoring unsupported event"),
        }
    }

    pub async fn handle_interaction(&self, interaction: Interaction) {
        match interaction {
            Interaction::Shortcut {
                callback_id,
                trigger_id,
                user,
            } => {
                debug!("Shortcut {} from {}", callback_id, user.id);
                self.open_shortcut(&callback_id, &trigger_id).await;
            }
            Interaction::ViewSubmission { user, view } => self.submit_view(&user, &view).await,
            Interaction::BlockActions { user, actions } => {
                for action in actions {
                    if action.action_id == CONNECT_ACTION {
                        self.connect(&user).await;
                    } else if action.action_id.starts_with(DELETE_CHECKBOX_PREFIX) {
                        debug!("Checkbox toggled: {}", action.action_id);
                    } else {
                        debug!("Ignoring action {}", action.action_id);
                    }
                }
            }
            Interaction::Unsupported => debug!("Ignoring unsupported interaction"),
        }
    }

    /// Post the home message: connect button until the tracker is connected
    pub async fn home_opened(&self, user_id: &str) {
        let blocks = if self.services.tokens.is_connected().await {
            template_blocks(&self.templates.default)
        } else {
            let mut blocks = template_blocks(&self.templates.connection);
            let url = self.services.tokens.authorization_url().await;
            if !inject_connect_url(&mut blocks, &url) {
                warn!("Connection template has no accessory to carry the authorization URL");
            }
            blocks
        };
        self.post(user_id, ChatMessage::with_blocks(WELCOME_TEXT, blocks))
            .await;
    }

    async fn open_shortcut(&self, callback_id: &str, trigger_id: &str) {
        let view = match callback_id {
            ADD_QUESTION_SHORTCUT => self.templates.add_questions.clone(),
            DELETE_QUESTION_SHORTCUT => {
                delete_questions_view(self.services.questions.list_for_deletion().await)
            }
            QUESTIONS_SHORTCUT => {
                let list = self.services.questions.snapshot().await;
                self.services.views.render(&list)
            }
            other => {
                debug!("Ignoring unknown shortcut {}", other);
                return;
            }
        };
        if let Err(e) = self.services.chat.open_view(trigger_id, &view).await {
            warn!("Failed to open {} view: {}", callback_id, e);
        }
    }

    async fn submit_view(&self, user: &SlackUser, view: &SubmittedView) {
        match view.callback_id.as_str() {
            ADD_QUESTION_CALLBACK => {
                let raw = view
                    .text_value(NEW_QUESTIONS_BLOCK, NEW_QUESTIONS_ACTION)
                    .unwrap_or_default();
                self.add_questions(&user.id, raw).await;
            }
            DELETE_QUESTION_CALLBACK => {
                let selected: BTreeSet<String> =
                    view.checked_blocks().map(str::to_string).collect();
                self.delete_questions(&user.id, &selected).await;
            }
            QUESTIONNAIRE_CALLBACK_ID => self.run_questionnaire(user, view).await,
            other => debug!("Ignoring submission of unknown view {}", other),
        }
    }

    pub async fn add_questions(&self, user_id: &str, raw: &str) {
        let text = match self.services.questions.add_questions(raw).await {
            Ok(added) => format!("{} new questions added.", added),
            Err(QuestionStoreError::Validation(e)) => format!("0 new questions added. {}", e),
            Err(e) => {
                error!("Adding questions failed: {}", e);
                format!("0 new questions added. {}", e)
            }
        };
        self.post(user_id, ChatMessage::text(text)).await;
    }

    pub async fn delete_questions(&self, user_id: &str, selected: &BTreeSet<String>) {
        if selected.is_empty() {
            self.post(user_id, ChatMessage::text("No Questions Selected for Deletion."))
                .await;
            return;
        }
        let text = match self.services.questions.delete_questions(selected).await {
            Ok(deleted) => format!("{} question(s) deleted.", deleted),
            Err(e) => {
                error!("Deleting questions failed: {}", e);
                format!("0 question(s) deleted. {}", e)
            }
        };
        self.post(user_id, ChatMessage::text(text)).await;
    }

    async fn run_questionnaire(&self, user: &SlackUser, view: &SubmittedView) {
        let input = RunQuestionnaireInput {
            user_id: user.id.clone(),
            username: user.handle().to_string(),
            answers: view.answers(),
        };
        match self.services.questionnaire.execute(input).await {
            Ok(QuestionnaireOutcome::TicketFailed {
                error: SubmitTicketError::Token(e),
                ..
            }) => {
                self.notify_operator(&format!("Jira token refresh failed: {}", e))
                    .await;
            }
            Ok(_) => {}
            Err(e) => {
                error!("Questionnaire from {} could not be scored: {}", user.id, e);
                self.post(
                    &user.id,
                    ChatMessage::text(format!("The questionnaire could not be scored: {}", e)),
                )
                .await;
            }
        }
    }

    /// Wait for the OAuth callback, discover the site, then post the home blocks
    pub async fn connect(&self, user: &SlackUser) {
        let wait = self.services.tokens.wait_until_connected();
        let connected = match self.config.connect_timeout {
            Some(limit) => tokio::time::timeout(limit, wait).await.is_ok(),
            None => {
                wait.await;
                true
            }
        };
        if !connected {
            warn!("Jira connection for {} was not completed in time", user.id);
            self.post(
                &user.id,
                ChatMessage::text(
                    "The Jira connection was not completed in time. \
                     Open the app home to try again.",
                ),
            )
            .await;
            return;
        }

        match self.services.submitter.discover_site().await {
            Ok(site) => info!("Connected to {}", site.site_url),
            Err(e) => {
                error!("Site discovery failed: {}", e);
                self.post(
                    &user.id,
                    ChatMessage::text(format!(
                        "Connected, but no Jira site could be reached: {}",
                        e
                    )),
                )
                .await;
                return;
            }
        }

        let blocks = template_blocks(&self.templates.default);
        self.post(&user.id, ChatMessage::with_blocks(WELCOME_TEXT, blocks))
            .await;
    }

    /// Post to the operator (audit) channel
    pub async fn notify_operator(&self, text: &str) {
        self.post(&self.config.audit_channel, ChatMessage::text(text))
            .await;
    }

    async fn post(&self, channel: &str, message: ChatMessage) {
        if let Err(e) = self.services.chat.post_message(channel, &message).await {
            warn!("Failed to post a message to {}: {}", channel, e);
        }
    }
}
