//! Storage configuration from TOML (`[storage]` section)

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Raw storage configuration from TOML
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileStorageConfig {
    /// Folder holding the JSON documents (questionnaire, templates, tokens)
    pub shared_folder: PathBuf,
    /// JSONL ticket audit log; disabled when unset
    pub audit_log: Option<PathBuf>,
}

impl Default for FileStorageConfig {
    fn default() -> Self {
        Self {
            shared_folder: PathBuf::from("shared"),
            audit_log: None,
        }
    }
}
