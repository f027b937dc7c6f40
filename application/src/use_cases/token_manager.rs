//! Token Manager
//!
//! Holds the tracker credential and drives its OAuth lifecycle: issuing the
//! consent URL, exchanging the callback code, refreshing after a rejected
//! access token, and signalling handlers waiting for the first connection.

use crate::ports::storage::{CredentialStore, StoreError};
use crate::ports::ticket_audit::{NoTicketAudit, TicketAuditEvent, TicketAuditLog};
use crate::ports::tracker_gateway::{TrackerError, TrackerGateway};
use rand::Rng;
use rand::distributions::Alphanumeric;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::{Mutex, watch};
use tokio::time::Instant;
use tracing::{debug, info, warn};
use triage_domain::{Credential, OAuthGrant};

/// Length of the random OAuth `state` value
const STATE_LEN: usize = 22;

/// How long an issued `state` stays valid unless configured otherwise
pub const DEFAULT_STATE_TTL: Duration = Duration::from_secs(600);

/// Most `state` values outstanding at once; the oldest is dropped first
const MAX_PENDING_STATES: usize = 32;

/// Errors that can occur in the credential lifecycle
#[derive(Error, Debug)]
pub enum TokenError {
    #[error("Authorization code exchange failed: {0}")]
    AuthExchange(TrackerError),

    #[error("Token refresh failed: {0}")]
    AuthRefresh(String),

    #[error("Unknown or reused OAuth state")]
    InvalidState,

    #[error("Failed to persist credential: {0}")]
    Persistence(#[from] StoreError),
}

/// Owner of the tracker credential
pub struct TokenManager {
    gateway: Arc<dyn TrackerGateway>,
    store: Arc<dyn CredentialStore>,
    credential: Mutex<Option<Credential>>,
    pending_states: Mutex<HashMap<String, Instant>>,
    state_ttl: Duration,
    connected: watch::Sender<bool>,
    audit: Arc<dyn TicketAuditLog>,
}

impl TokenManager {
    /// Create a manager seeded with the stored credential, if any
    pub fn load(
        gateway: Arc<dyn TrackerGateway>,
        store: Arc<dyn CredentialStore>,
    ) -> Result<Self, StoreError> {
        let credential = store.load()?;
        let (connected, _) = watch::channel(credential.is_some());
        if credential.is_some() {
            debug!("Loaded stored tracker credential");
        }
        Ok(Self {
            gateway,
            store,
            credential: Mutex::new(credential),
            pending_states: Mutex::new(HashMap::new()),
            state_ttl: DEFAULT_STATE_TTL,
            connected,
            audit: Arc::new(NoTicketAudit),
        })
    }

    pub fn with_audit(mut self, audit: Arc<dyn TicketAuditLog>) -> Self {
        self.audit = audit;
        self
    }

    /// Set how long an issued `state` is accepted by the callback
    pub fn with_state_ttl(mut self, ttl: Duration) -> Self {
        self.state_ttl = ttl;
        self
    }

    /// The current credential; `None` when the tracker is not connected
    pub async fn current(&self) -> Option<Credential> {
        self.credential.lock().await.clone()
    }

    pub async fn is_connected(&self) -> bool {
        self.credential.lock().await.is_some()
    }

    /// Consent URL carrying a fresh single-use `state`.
    ///
    /// Expired states are dropped first, and at most `MAX_PENDING_STATES`
    /// stay outstanding.
    pub async fn authorization_url(&self) -> String {
        let state: String = rand::thread_rng()
            .sample_iter(&Alphanumeric)
            .take(STATE_LEN)
            .map(char::from)
            .collect();

        let now = Instant::now();
        let mut pending = self.pending_states.lock().await;
        pending.retain(|_, issued| now.duration_since(*issued) < self.state_ttl);
        while pending.len() >= MAX_PENDING_STATES {
            let Some(oldest) = pending
                .iter()
                .min_by_key(|(_, issued)| **issued)
                .map(|(state, _)| state.clone())
            else {
                break;
            };
            pending.remove(&oldest);
        }
        pending.insert(state.clone(), now);
        drop(pending);

        self.gateway.authorization_url(&state)
    }

    /// Consume an issued `state`; false if it was never issued, already used
    /// or expired
    pub async fn take_state(&self, state: &str) -> bool {
        match self.pending_states.lock().await.remove(state) {
            Some(issued) => issued.elapsed() < self.state_ttl,
            None => false,
        }
    }

    /// Exchange an authorization code for a credential and store it.
    ///
    /// Nothing is persisted when the token endpoint fails. On success every
    /// handler waiting in [`wait_until_connected`](Self::wait_until_connected)
    /// is released.
    pub async fn exchange_code(&self, code: &str) -> Result<Credential, TokenError> {
        let mut current = self.credential.lock().await;

        let grant = OAuthGrant::AuthorizationCode {
            code: code.to_string(),
        };
        let credential = self
            .gateway
            .request_token(&grant)
            .await
            .map_err(TokenError::AuthExchange)?;
        if !credential.is_complete() {
            return Err(TokenError::AuthExchange(TrackerError::UnexpectedResponse(
                "token response is missing a token".to_string(),
            )));
        }

        self.store.save(&credential)?;
        *current = Some(credential.clone());
        drop(current);
        self.pending_states.lock().await.clear();

        info!("Tracker connected");
        self.connected.send_replace(true);
        Ok(credential)
    }

    /// Replace the credential using the stored refresh token.
    pub async fn refresh(&self) -> Result<Credential, TokenError> {
        let mut current = self.credential.lock().await;

        let Some(refresh_token) = current.as_ref().map(|c| c.refresh_token.clone()) else {
            return Err(TokenError::AuthRefresh(
                "no stored credential to refresh".to_string(),
            ));
        };

        let grant = OAuthGrant::RefreshToken { refresh_token };
        let credential = match self.gateway.request_token(&grant).await {
            Ok(credential) if credential.is_complete() => credential,
            Ok(_) => {
                return Err(TokenError::AuthRefresh(
                    "token response is missing a token".to_string(),
                ));
            }
            Err(e) => {
                warn!("Token refresh rejected: {}", e);
                return Err(TokenError::AuthRefresh(e.to_string()));
            }
        };

        self.store.save(&credential)?;
        *current = Some(credential.clone());

        info!("Tracker access token refreshed");
        self.audit.record(TicketAuditEvent::new(
            "token_refreshed",
            serde_json::json!({ "expires_in": credential.expires_in }),
        ));
        Ok(credential)
    }

    /// Resolve once a credential is available; immediately if one already is
    pub async fn wait_until_connected(&self) {
        let mut receiver = self.connected.subscribe();
        // The sender lives in `self`, so the channel cannot close while we wait.
        let _ = receiver.wait_for(|connected| *connected).await;
    }
}
