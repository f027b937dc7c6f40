//! Question Store
//!
//! Owns the in-memory questionnaire and keeps it in step with storage.
//! Each mutation runs under one lock covering read → change → persist, and
//! the in-memory list is only replaced once the save succeeded.

use crate::ports::storage::{QuestionnaireRepository, StoreError};
use std::collections::BTreeSet;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{debug, info};
use triage_domain::{DomainError, QuestionList};

/// Errors that can occur while changing the questionnaire
#[derive(Error, Debug)]
pub enum QuestionStoreError {
    #[error(transparent)]
    Validation(#[from] DomainError),

    #[error("Failed to persist questionnaire: {0}")]
    Persistence(#[from] StoreError),
}

/// A question offered for deletion
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeletionEntry {
    pub label: String,
    pub block_id: String,
}

/// Shared, persisted questionnaire
pub struct QuestionStore {
    list: Mutex<QuestionList>,
    repository: Arc<dyn QuestionnaireRepository>,
}

impl QuestionStore {
    /// Load the stored questionnaire
    pub fn load(repository: Arc<dyn QuestionnaireRepository>) -> Result<Self, StoreError> {
        let list = repository.load()?;
        debug!("Loaded questionnaire with {} questions", list.len());
        Ok(Self {
            list: Mutex::new(list),
            repository,
        })
    }

    /// Add one question per non-blank line of `raw_text`.
    ///
    /// Input without any usable line is a validation error and changes nothing.
    pub async fn add_questions(&self, raw_text: &str) -> Result<usize, QuestionStoreError> {
        let labels = QuestionList::parse_new_questions(raw_text)?;

        let mut list = self.list.lock().await;
        let mut next = list.clone();
        let added = next.add_questions(labels);
        self.repository.save(&next)?;
        *list = next;

        info!("Added {} questions ({} total)", added, list.len());
        Ok(added)
    }

    /// Delete the selected questions by block id.
    ///
    /// An empty selection, or one matching nothing, deletes nothing and
    /// writes nothing.
    pub async fn delete_questions(
        &self,
        selected_block_ids: &BTreeSet<String>,
    ) -> Result<usize, QuestionStoreError> {
        if selected_block_ids.is_empty() {
            return Ok(0);
        }

        let mut list = self.list.lock().await;
        let mut next = list.clone();
        let deleted = next.delete_questions(selected_block_ids);
        if deleted == 0 {
            debug!("No selected question matched the questionnaire");
            return Ok(0);
        }
        self.repository.save(&next)?;
        *list = next;

        info!("Deleted {} questions ({} left)", deleted, list.len());
        Ok(deleted)
    }

    /// Questions (label + block id) as of now, dividers excluded
    pub async fn list_for_deletion(&self) -> std::vec::IntoIter<DeletionEntry> {
        let list = self.list.lock().await;
        list.deletion_candidates()
            .map(|c| DeletionEntry {
                label: c.label.to_string(),
                block_id: c.block_id.to_string(),
            })
            .collect::<Vec<_>>()
            .into_iter()
    }

    /// Copy of the current questionnaire
    pub async fn snapshot(&self) -> QuestionList {
        self.list.lock().await.clone()
    }
}
