//! JSON documents in the shared folder
//!
//! Every document the bot reads or writes lives as `<name>.json` in one
//! folder. Templates are read as opaque JSON; writes go through
//! [`atomic_write`](super::atomic::atomic_write).

use super::atomic::atomic_write;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::path::{Path, PathBuf};
use tracing::debug;
use triage_application::StoreError;
use triage_domain::TierCatalog;

/// Document names (without the `.json` extension)
pub mod documents {
    pub const SLACK_CONFIG: &str = "slack_config";
    pub const DEFAULT: &str = "default";
    pub const CONNECTION: &str = "connection";
    pub const QUESTION_LEVELS: &str = "question_levels";
    pub const MODEL_DATA: &str = "model_data";
    pub const ADD_QUESTIONS: &str = "add_questions";
    pub const JIRA_TOKENS: &str = "jira_tokens";
}

/// Folder of JSON documents
#[derive(Debug, Clone)]
pub struct SharedFolder {
    root: PathBuf,
}

impl SharedFolder {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn path_of(&self, document: &str) -> PathBuf {
        self.root.join(format!("{}.json", document))
    }

    pub fn exists(&self, document: &str) -> bool {
        self.path_of(document).exists()
    }

    /// Read and decode a document that must exist
    pub fn read<T: DeserializeOwned>(&self, document: &str) -> Result<T, StoreError> {
        let path = self.path_of(document);
        let text = std::fs::read_to_string(&path).map_err(|source| StoreError::Io {
            document: document.to_string(),
            source,
        })?;
        serde_json::from_str(&text).map_err(|e| StoreError::InvalidDocument {
            document: document.to_string(),
            reason: e.to_string(),
        })
    }

    /// Read a document that may be absent
    pub fn read_optional<T: DeserializeOwned>(
        &self,
        document: &str,
    ) -> Result<Option<T>, StoreError> {
        if !self.exists(document) {
            return Ok(None);
        }
        self.read(document).map(Some)
    }

    /// Encode and atomically replace a document
    pub fn write<T: Serialize + ?Sized>(
        &self,
        document: &str,
        value: &T,
    ) -> Result<(), StoreError> {
        let data = serde_json::to_vec_pretty(value).map_err(|e| StoreError::InvalidDocument {
            document: document.to_string(),
            reason: e.to_string(),
        })?;
        atomic_write(&self.path_of(document), &data).map_err(|source| StoreError::Io {
            document: document.to_string(),
            source,
        })?;
        debug!("Wrote {}", self.path_of(document).display());
        Ok(())
    }

    /// Read a UI template (message blocks or modal view)
    pub fn template(&self, document: &str) -> Result<Value, StoreError> {
        self.read(document)
    }

    /// Read and validate the five tier levels
    pub fn tier_catalog(&self) -> Result<TierCatalog, StoreError> {
        let catalog: TierCatalog = self.read(documents::QUESTION_LEVELS)?;
        catalog.validate().map_err(|e| StoreError::InvalidDocument {
            document: documents::QUESTION_LEVELS.to_string(),
            reason: e.to_string(),
        })?;
        Ok(catalog)
    }
}
