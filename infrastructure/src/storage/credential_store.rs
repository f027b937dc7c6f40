//! Tracker credential stored as `jira_tokens.json`

use super::shared_folder::{SharedFolder, documents};
use triage_application::{CredentialStore, StoreError};
use triage_domain::Credential;

/// Credential store over the shared folder
pub struct JsonCredentialStore {
    folder: SharedFolder,
}

impl JsonCredentialStore {
    pub fn new(folder: SharedFolder) -> Self {
        Self { folder }
    }
}

impl CredentialStore for JsonCredentialStore {
    fn load(&self) -> Result<Option<Credential>, StoreError> {
        self.folder.read_optional(documents::JIRA_TOKENS)
    }

    fn save(&self, credential: &Credential) -> Result<(), StoreError> {
        self.folder.write(documents::JIRA_TOKENS, credential)
    }
}
