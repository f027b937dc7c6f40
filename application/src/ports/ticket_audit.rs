//! Port for structured ticket audit logging.
//!
//! Defines the [`TicketAuditLog`] trait for recording ticket lifecycle events
//! (scores, created tickets, failed submissions, token refreshes) to a
//! structured log.
//!
//! This is separate from `tracing`-based operation logs: tracing handles
//! human-readable diagnostic messages, while this port keeps a
//! machine-readable record (JSONL) of what was filed and why.

use serde_json::Value;

/// A structured ticket event for logging.
pub struct TicketAuditEvent {
    /// Event type identifier (e.g., "ticket_created", "no_findings").
    pub event_type: &'static str,
    /// JSON payload with event-specific data.
    pub payload: Value,
}

impl TicketAuditEvent {
    pub fn new(event_type: &'static str, payload: Value) -> Self {
        Self {
            event_type,
            payload,
        }
    }
}

/// Port for logging ticket events to a structured log.
///
/// `record` is synchronous and non-fallible: audit failures never disturb
/// ticket handling.
pub trait TicketAuditLog: Send + Sync {
    fn record(&self, event: TicketAuditEvent);
}

/// No-op implementation for tests and when auditing is disabled.
pub struct NoTicketAudit;

impl TicketAuditLog for NoTicketAudit {
    fn record(&self, _event: TicketAuditEvent) {}
}
