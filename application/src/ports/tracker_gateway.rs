//! Tracker Gateway port
//!
//! Defines the interface for talking to the issue tracker: the OAuth token
//! endpoint, site discovery and issue creation.

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;
use triage_domain::{Credential, OAuthGrant, SiteInfo, TicketRecord};

/// Errors that can occur during tracker gateway operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TrackerError {
    /// The access token was rejected (HTTP 401, or `code: 401` in the body)
    #[error("Unauthorized")]
    Unauthorized,

    #[error("Connection error: {0}")]
    ConnectionError(String),

    #[error("Rejected by tracker (status {status}): {message}")]
    Rejected { status: u16, message: String },

    #[error("Unexpected response: {0}")]
    UnexpectedResponse(String),
}

impl TrackerError {
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, TrackerError::Unauthorized)
    }
}

/// Gateway for issue-tracker communication
///
/// This port defines how the application layer reaches the tracker.
/// Implementations (adapters) live in the infrastructure layer.
#[async_trait]
pub trait TrackerGateway: Send + Sync {
    /// Consent URL the user opens to connect the tracker
    fn authorization_url(&self, state: &str) -> String;

    /// Call the token endpoint with an authorization code or refresh token
    async fn request_token(&self, grant: &OAuthGrant) -> Result<Credential, TrackerError>;

    /// Sites the access token can reach
    async fn accessible_resources(&self, access_token: &str)
    -> Result<Vec<SiteInfo>, TrackerError>;

    /// File an issue on the given site
    async fn create_issue(
        &self,
        access_token: &str,
        cloud_id: &str,
        payload: &Value,
    ) -> Result<TicketRecord, TrackerError>;
}
