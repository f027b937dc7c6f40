//! Core domain concepts shared across all subdomains.
//!
//! - [`error::DomainError`]: domain-level errors
//! - [`string`]: markup helpers for chat text

pub mod error;
pub mod string;
