//! Persistence ports
//!
//! Durable storage for the live questionnaire, the tracker credential and
//! the discovered site. Writes are synchronous and all-or-nothing: a failed
//! save leaves the previously stored document in place.

use thiserror::Error;
use triage_domain::{Credential, QuestionList, SiteInfo};

/// Errors that can occur while reading or writing stored documents
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("I/O error on {document}: {source}")]
    Io {
        document: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid {document} document: {reason}")]
    InvalidDocument { document: String, reason: String },
}

/// Storage for the live questionnaire
pub trait QuestionnaireRepository: Send + Sync {
    fn load(&self) -> Result<QuestionList, StoreError>;

    fn save(&self, list: &QuestionList) -> Result<(), StoreError>;
}

/// Storage for the tracker credential
pub trait CredentialStore: Send + Sync {
    /// The stored credential, or `None` when the tracker was never connected
    fn load(&self) -> Result<Option<Credential>, StoreError>;

    /// Overwrite the stored credential
    fn save(&self, credential: &Credential) -> Result<(), StoreError>;
}

/// Storage for the discovered tracker site
pub trait SiteStore: Send + Sync {
    fn load_site(&self) -> Result<Option<SiteInfo>, StoreError>;

    fn save_site(&self, site: &SiteInfo) -> Result<(), StoreError>;
}
