//! Logging infrastructure: structured ticket audit logging.
//!
//! Provides [`JsonlTicketAudit`], a JSONL file writer that implements the
//! [`TicketAuditLog`](triage_application::TicketAuditLog) port.

mod jsonl_audit;

pub use jsonl_audit::JsonlTicketAudit;
