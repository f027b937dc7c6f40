//! Application layer for triage-bot
//!
//! This crate contains use cases, port definitions, and workflow configuration.
//! It depends only on the domain layer.

pub mod config;
pub mod ports;
pub mod use_cases;

// Re-export commonly used types
pub use config::{DEFAULT_AUDIT_CHANNEL, WorkflowConfig};
pub use ports::{
    chat_gateway::{ChatError, ChatGateway, ChatMessage},
    storage::{CredentialStore, QuestionnaireRepository, SiteStore, StoreError},
    ticket_audit::{NoTicketAudit, TicketAuditEvent, TicketAuditLog},
    tracker_gateway::{TrackerError, TrackerGateway},
};
pub use use_cases::question_store::{DeletionEntry, QuestionStore, QuestionStoreError};
pub use use_cases::run_questionnaire::{
    NO_FINDINGS_TEXT, QuestionnaireOutcome, RunQuestionnaireError, RunQuestionnaireInput,
    RunQuestionnaireUseCase,
};
pub use use_cases::session_tracker::SessionTracker;
pub use use_cases::submit_ticket::{SubmitTicketError, TicketSubmitter};
pub use use_cases::token_manager::{DEFAULT_STATE_TTL, TokenError, TokenManager};
