//! Shared-folder persistence
//!
//! Adapters for the storage ports over the JSON documents of the shared
//! folder. All writes are atomic.

mod atomic;
mod credential_store;
mod questionnaire;
mod shared_folder;
mod slack_config;

pub use atomic::atomic_write;
pub use credential_store::JsonCredentialStore;
pub use questionnaire::{
    QUESTIONNAIRE_CALLBACK_ID, ViewQuestionnaireRepository, decode_blocks, encode_blocks,
};
pub use shared_folder::{SharedFolder, documents};
pub use slack_config::{CLOUD_ID_KEY, SITE_URL_KEY, SlackConfigStore};
