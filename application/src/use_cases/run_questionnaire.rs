//! Run Questionnaire use case
//!
//! Turns a submitted questionnaire into a ticket: collect the answers into
//! the user's session, score them, file the ticket and tell the user.
//! Notification failures are logged and never abort the flow.

use super::session_tracker::SessionTracker;
use super::submit_ticket::{SubmitTicketError, TicketSubmitter};
use crate::config::WorkflowConfig;
use crate::ports::chat_gateway::{ChatGateway, ChatMessage};
use crate::ports::ticket_audit::{NoTicketAudit, TicketAuditEvent, TicketAuditLog};
use serde_json::json;
use std::sync::Arc;
use thiserror::Error;
use tracing::{error, info, warn};
use triage_domain::{
    Answer, DomainError, ScoreReport, ScoreResult, SessionAnswer, TicketRecord, TierCatalog,
};

/// Text posted to the audit channel when every answer is "no"
pub const NO_FINDINGS_TEXT: &str = "All Answers were No";

/// Errors that stop a questionnaire before a ticket is attempted
#[derive(Error, Debug)]
pub enum RunQuestionnaireError {
    #[error(transparent)]
    Domain(#[from] DomainError),
}

/// A submitted questionnaire
#[derive(Debug, Clone)]
pub struct RunQuestionnaireInput {
    /// Chat user id; replies go to the user's direct channel
    pub user_id: String,
    /// Display handle used in the greeting and the ticket log
    pub username: String,
    /// `(question label, answer)` in questionnaire order
    pub answers: Vec<(String, Answer)>,
}

/// What happened to a submission
#[derive(Debug)]
pub enum QuestionnaireOutcome {
    /// No "yes" answers; the audit channel was notified, no ticket filed
    NoFindings,
    TicketCreated {
        ticket: TicketRecord,
        browse_url: String,
        report: ScoreReport,
    },
    /// Filing failed; the answers are handed back so the user can resubmit
    TicketFailed {
        report: ScoreReport,
        answers: Vec<SessionAnswer>,
        error: SubmitTicketError,
    },
}

/// Use case for scoring a questionnaire and filing its ticket
pub struct RunQuestionnaireUseCase {
    sessions: Arc<SessionTracker>,
    submitter: Arc<TicketSubmitter>,
    chat: Arc<dyn ChatGateway>,
    catalog: TierCatalog,
    config: WorkflowConfig,
    audit: Arc<dyn TicketAuditLog>,
}

impl RunQuestionnaireUseCase {
    pub fn new(
        sessions: Arc<SessionTracker>,
        submitter: Arc<TicketSubmitter>,
        chat: Arc<dyn ChatGateway>,
        catalog: TierCatalog,
        config: WorkflowConfig,
    ) -> Self {
        Self {
            sessions,
            submitter,
            chat,
            catalog,
            config,
            audit: Arc::new(NoTicketAudit),
        }
    }

    pub fn with_audit(mut self, audit: Arc<dyn TicketAuditLog>) -> Self {
        self.audit = audit;
        self
    }

    pub async fn execute(
        &self,
        input: RunQuestionnaireInput,
    ) -> Result<QuestionnaireOutcome, RunQuestionnaireError> {
        let answers = self.collect(&input).await;
        let result = ScoreResult::from_answers(&answers);

        let ScoreResult::Scored(score) = result else {
            info!("Questionnaire from {} had no findings", input.user_id);
            self.audit.record(TicketAuditEvent::new(
                "no_findings",
                json!({ "user": input.user_id, "answers": answers.len() }),
            ));
            self.notify(&self.config.audit_channel, ChatMessage::text(NO_FINDINGS_TEXT))
                .await;
            return Ok(QuestionnaireOutcome::NoFindings);
        };

        let level = self.catalog.level(score.tier)?;
        let report = ScoreReport::new(&score, level);
        info!(
            "Questionnaire from {} scored {} ({})",
            input.user_id,
            score.yes_count,
            score.tier.catalog_key()
        );

        match self
            .submitter
            .submit(&report.body, &input.username, &report.title)
            .await
        {
            Ok(ticket) => {
                let browse_url = match self.submitter.site().await {
                    Some(site) => site.browse_url(&ticket.key),
                    None => ticket.self_url.clone(),
                };
                self.audit.record(TicketAuditEvent::new(
                    "ticket_created",
                    json!({
                        "user": input.user_id,
                        "reporter": input.username,
                        "key": ticket.key,
                        "tier": score.tier.level(),
                        "score": score.yes_count,
                    }),
                ));

                let text = format!(
                    "Hi <@{}>!\n\n{}\n*Ticket Link*: {}",
                    input.username, report.body, browse_url
                );
                self.notify(&input.user_id, ChatMessage::text(text)).await;

                Ok(QuestionnaireOutcome::TicketCreated {
                    ticket,
                    browse_url,
                    report,
                })
            }
            Err(e) => {
                error!("Ticket for {} could not be filed: {}", input.user_id, e);
                self.audit.record(TicketAuditEvent::new(
                    "ticket_failed",
                    json!({
                        "user": input.user_id,
                        "tier": score.tier.level(),
                        "score": score.yes_count,
                        "error": e.to_string(),
                    }),
                ));

                let text = format!(
                    "Hi <@{}>! The ticket could not be created ({}). \
                     Submit the questionnaire again to retry.\n\n{}",
                    input.username, e, report.body
                );
                self.notify(&input.user_id, ChatMessage::text(text)).await;

                Ok(QuestionnaireOutcome::TicketFailed {
                    report,
                    answers,
                    error: e,
                })
            }
        }
    }

    /// Record the submission into the user's session and drain it
    async fn collect(&self, input: &RunQuestionnaireInput) -> Vec<SessionAnswer> {
        let _guard = self.sessions.lock_user(&input.user_id).await;
        self.sessions.begin(&input.user_id).await;
        for (question, answer) in &input.answers {
            self.sessions
                .record(&input.user_id, question.as_str(), *answer)
                .await;
        }
        self.sessions.drain(&input.user_id).await
    }

    async fn notify(&self, channel: &str, message: ChatMessage) {
        if let Err(e) = self.chat.post_message(channel, &message).await {
            warn!("Failed to post a message to {}: {}", channel, e);
        }
    }
}
