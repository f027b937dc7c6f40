//! Port definitions (interfaces for external adapters)
//!
//! Ports define the contracts that infrastructure adapters must implement.

pub mod chat_gateway;
pub mod storage;
pub mod ticket_audit;
pub mod tracker_gateway;
