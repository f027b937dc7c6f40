//! Ticket Submitter
//!
//! Files a ticket on the connected tracker site. A rejected access token
//! triggers exactly one refresh and one retry; a second rejection is
//! reported, never retried again.

use super::token_manager::{TokenError, TokenManager};
use crate::ports::storage::{SiteStore, StoreError};
use crate::ports::tracker_gateway::{TrackerError, TrackerGateway};
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};
use triage_domain::{IssueDefaults, IssueDraft, SiteInfo, TicketRecord};

/// Errors that can occur while filing a ticket
#[derive(Error, Debug)]
pub enum SubmitTicketError {
    #[error("Tracker is not connected")]
    NotConnected,

    #[error("No tracker site is reachable with the current token")]
    NoSite,

    #[error("Access token still rejected after refresh")]
    Unauthorized,

    #[error(transparent)]
    Token(#[from] TokenError),

    #[error("Tracker error: {0}")]
    Tracker(#[from] TrackerError),

    #[error("Failed to persist site details: {0}")]
    Persistence(#[from] StoreError),
}

/// Files tickets and tracks the site they go to
pub struct TicketSubmitter {
    gateway: Arc<dyn TrackerGateway>,
    tokens: Arc<TokenManager>,
    sites: Arc<dyn SiteStore>,
    site: RwLock<Option<SiteInfo>>,
    defaults: IssueDefaults,
}

impl TicketSubmitter {
    /// Create a submitter, seeding the site from storage when known
    pub fn load(
        gateway: Arc<dyn TrackerGateway>,
        tokens: Arc<TokenManager>,
        sites: Arc<dyn SiteStore>,
        defaults: IssueDefaults,
    ) -> Result<Self, StoreError> {
        let site = sites.load_site()?;
        Ok(Self {
            gateway,
            tokens,
            sites,
            site: RwLock::new(site),
            defaults,
        })
    }

    /// The site tickets are filed on, if discovered
    pub async fn site(&self) -> Option<SiteInfo> {
        self.site.read().await.clone()
    }

    /// Look up the first site reachable with the current token and persist it.
    ///
    /// Runs once after each connection event.
    pub async fn discover_site(&self) -> Result<SiteInfo, SubmitTicketError> {
        let credential = self
            .tokens
            .current()
            .await
            .ok_or(SubmitTicketError::NotConnected)?;

        let resources = match self
            .gateway
            .accessible_resources(&credential.access_token)
            .await
        {
            Err(TrackerError::Unauthorized) => {
                let refreshed = self.tokens.refresh().await?;
                self.gateway
                    .accessible_resources(&refreshed.access_token)
                    .await?
            }
            other => other?,
        };

        let site = resources
            .into_iter()
            .next()
            .ok_or(SubmitTicketError::NoSite)?;

        let mut cached = self.site.write().await;
        self.sites.save_site(&site)?;
        *cached = Some(site.clone());

        info!("Tracker site discovered: {}", site.site_url);
        Ok(site)
    }

    /// File a ticket with `body` as its description and `title` as its summary.
    pub async fn submit(
        &self,
        body: &str,
        reporter_name: &str,
        title: &str,
    ) -> Result<TicketRecord, SubmitTicketError> {
        let credential = self
            .tokens
            .current()
            .await
            .ok_or(SubmitTicketError::NotConnected)?;

        let site = match self.site().await {
            Some(site) => site,
            None => self.discover_site().await?,
        };

        let payload = IssueDraft::new(title, body).to_payload(&self.defaults);
        debug!("Filing ticket for {} on {}", reporter_name, site.site_url);

        let first = self
            .gateway
            .create_issue(&credential.access_token, &site.cloud_id, &payload)
            .await;

        let ticket = match first {
            Ok(ticket) => ticket,
            Err(TrackerError::Unauthorized) => {
                warn!("Access token rejected, refreshing and retrying once");
                let refreshed = self.tokens.refresh().await?;
                match self
                    .gateway
                    .create_issue(&refreshed.access_token, &site.cloud_id, &payload)
                    .await
                {
                    Ok(ticket) => ticket,
                    Err(TrackerError::Unauthorized) => return Err(SubmitTicketError::Unauthorized),
                    Err(e) => return Err(e.into()),
                }
            }
            Err(e) => return Err(e.into()),
        };

        info!("Ticket {} filed for {}", ticket.key, reporter_name);
        Ok(ticket)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::use_cases::token_manager::tests::MemoryCredentialStore;
    use async_trait::async_trait;
    use serde_json::Value;
    use std::collections::VecDeque;
    use std::sync::Mutex as StdMutex;
    use triage_domain::{Credential, OAuthGrant};

    /// Site store backed by memory
    #[derive(Default)]
    pub(crate) struct MemorySiteStore {
        pub(crate) stored: StdMutex<Option<SiteInfo>>,
    }

    impl SiteStore for MemorySiteStore {
        fn load_site(&self) -> Result<Option<SiteInfo>, StoreError> {
            Ok(self.stored.lock().unwrap().clone())
        }

        fn save_site(&self, site: &SiteInfo) -> Result<(), StoreError> {
            *self.stored.lock().unwrap() = Some(site.clone());
            Ok(())
        }
    }

    /// Tracker that replays scripted issue responses and counts every call
    pub(crate) struct ScriptedTracker {
        pub(crate) issues: StdMutex<VecDeque<Result<TicketRecord, TrackerError>>>,
        pub(crate) sites: StdMutex<Vec<SiteInfo>>,
        pub(crate) refreshes: StdMutex<usize>,
        pub(crate) issue_tokens: StdMutex<Vec<String>>,
        pub(crate) payloads: StdMutex<Vec<Value>>,
    }

    impl ScriptedTracker {
        pub(crate) fn new(issues: Vec<Result<TicketRecord, TrackerError>>) -> Self {
            Self {
                issues: StdMutex::new(issues.into()),
                sites: StdMutex::new(vec![SiteInfo::new("cloud-1", "https://acme.atlassian.net")]),
                refreshes: StdMutex::new(0),
                issue_tokens: StdMutex::new(Vec::new()),
                payloads: StdMutex::new(Vec::new()),
            }
        }

        pub(crate) fn refreshes(&self) -> usize {
            *self.refreshes.lock().unwrap()
        }

        pub(crate) fn issue_calls(&self) -> usize {
            self.issue_tokens.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl TrackerGateway for ScriptedTracker {
        fn authorization_url(&self, state: &str) -> String {
            format!("https://auth.example/authorize?state={}", state)
        }

        async fn request_token(&self, grant: &OAuthGrant) -> Result<Credential, TrackerError> {
            let mut refreshes = self.refreshes.lock().unwrap();
            *refreshes += 1;
            assert_eq!(grant.grant_type(), "refresh_token");
            Ok(Credential::new(format!("at-{}", *refreshes + 1), "rt"))
        }

        async fn accessible_resources(&self, _: &str) -> Result<Vec<SiteInfo>, TrackerError> {
            Ok(self.sites.lock().unwrap().clone())
        }

        async fn create_issue(
            &self,
            access_token: &str,
            cloud_id: &str,
            payload: &Value,
        ) -> Result<TicketRecord, TrackerError> {
            assert_eq!(cloud_id, "cloud-1");
            self.issue_tokens
                .lock()
                .unwrap()
                .push(access_token.to_string());
            self.payloads.lock().unwrap().push(payload.clone());
            self.issues
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or(Err(TrackerError::ConnectionError("no script".to_string())))
        }
    }

    pub(crate) fn submitter(
        tracker: Arc<ScriptedTracker>,
    ) -> (TicketSubmitter, Arc<MemorySiteStore>) {
        let store = Arc::new(MemoryCredentialStore::with(Credential::new("at-1", "rt-1")));
        let tokens = Arc::new(TokenManager::load(tracker.clone(), store).unwrap());
        let sites = Arc::new(MemorySiteStore::default());
        let submitter =
            TicketSubmitter::load(tracker, tokens, sites.clone(), IssueDefaults::default())
                .unwrap();
        (submitter, sites)
    }

    #[tokio::test]
    async fn test_submit_success_first_try() {
        let tracker = Arc::new(ScriptedTracker::new(vec![Ok(TicketRecord::new(
            "OPS-1", "self-1",
        ))]));
        let (submitter, _) = submitter(tracker.clone());

        let ticket = submitter.submit("*Total Score*: 1", "dana", "Low").await.unwrap();

        assert_eq!(ticket, TicketRecord::new("OPS-1", "self-1"));
        assert_eq!(tracker.refreshes(), 0);
        assert_eq!(tracker.issue_calls(), 1);
        let payload = &tracker.payloads.lock().unwrap()[0];
        assert_eq!(payload["fields"]["summary"], "Low");
    }

    #[tokio::test]
    async fn test_unauthorized_refreshes_once_and_retries_once() {
        let tracker = Arc::new(ScriptedTracker::new(vec![
            Err(TrackerError::Unauthorized),
            Ok(TicketRecord::new("X", "Y")),
        ]));
        let (submitter, _) = submitter(tracker.clone());

        let ticket = submitter.submit("body", "dana", "title").await.unwrap();

        assert_eq!(ticket.key, "X");
        assert_eq!(ticket.self_url, "Y");
        assert_eq!(tracker.refreshes(), 1);
        assert_eq!(
            *tracker.issue_tokens.lock().unwrap(),
            vec!["at-1".to_string(), "at-2".to_string()]
        );
    }

    #[tokio::test]
    async fn test_double_unauthorized_is_not_retried_again() {
        let tracker = Arc::new(ScriptedTracker::new(vec![
            Err(TrackerError::Unauthorized),
            Err(TrackerError::Unauthorized),
            Ok(TicketRecord::new("never", "never")),
        ]));
        let (submitter, _) = submitter(tracker.clone());

        let err = submitter.submit("body", "dana", "title").await.unwrap_err();

        assert!(matches!(err, SubmitTicketError::Unauthorized));
        assert_eq!(tracker.refreshes(), 1);
        assert_eq!(tracker.issue_calls(), 2);
    }

    #[tokio::test]
    async fn test_other_tracker_errors_are_not_retried() {
        let tracker = Arc::new(ScriptedTracker::new(vec![Err(TrackerError::Rejected {
            status: 400,
            message: "project required".to_string(),
        })]));
        let (submitter, _) = submitter(tracker.clone());

        let err = submitter.submit("body", "dana", "title").await.unwrap_err();

        assert!(matches!(err, SubmitTicketError::Tracker(TrackerError::Rejected { .. })));
        assert_eq!(tracker.refreshes(), 0);
        assert_eq!(tracker.issue_calls(), 1);
    }

    #[tokio::test]
    async fn test_discover_site_persists_first_resource() {
        let tracker = Arc::new(ScriptedTracker::new(vec![]));
        tracker
            .sites
            .lock()
            .unwrap()
            .push(SiteInfo::new("cloud-2", "https://other.atlassian.net"));
        let (submitter, sites) = submitter(tracker);

        let site = submitter.discover_site().await.unwrap();

        assert_eq!(site.cloud_id, "cloud-1");
        assert_eq!(sites.stored.lock().unwrap().clone(), Some(site.clone()));
        assert_eq!(submitter.site().await, Some(site));
    }

    #[tokio::test]
    async fn test_discover_site_without_resources() {
        let tracker = Arc::new(ScriptedTracker::new(vec![]));
        tracker.sites.lock().unwrap().clear();
        let (submitter, _) = submitter(tracker);

        let err = submitter.discover_site().await.unwrap_err();
        assert!(matches!(err, SubmitTicketError::NoSite));
    }

    #[tokio::test]
    async fn test_submit_when_not_connected() {
        let tracker = Arc::new(ScriptedTracker::new(vec![]));
        let tokens = Arc::new(
            TokenManager::load(tracker.clone(), Arc::new(MemoryCredentialStore::default()))
                .unwrap(),
        );
        let submitter = TicketSubmitter::load(
            tracker.clone(),
            tokens,
            Arc::new(MemorySiteStore::default()),
            IssueDefaults::default(),
        )
        .unwrap();

        let err = submitter.submit("body", "dana", "title").await.unwrap_err();
        assert!(matches!(err, SubmitTicketError::NotConnected));
        assert_eq!(tracker.issue_calls(), 0);
    }
}
