//! The `slack_config.json` key-value document
//!
//! Holds deployment secrets plus the derived tracker site. Only the site keys
//! are ever written; every other key is preserved as found.

use super::shared_folder::{SharedFolder, documents};
use serde_json::{Map, Value};
use std::sync::Mutex;
use triage_application::{SiteStore, StoreError};
use triage_domain::SiteInfo;

pub const CLOUD_ID_KEY: &str = "JIRA_CLOUD_ID";
pub const SITE_URL_KEY: &str = "JIRA_SITE_URL";

/// Site store over `slack_config.json`
pub struct SlackConfigStore {
    folder: SharedFolder,
    write_lock: Mutex<()>,
}

impl SlackConfigStore {
    pub fn new(folder: SharedFolder) -> Self {
        Self {
            folder,
            write_lock: Mutex::new(()),
        }
    }

    /// The whole document; empty when the file does not exist
    pub fn document(&self) -> Result<Map<String, Value>, StoreError> {
        Ok(self
            .folder
            .read_optional(documents::SLACK_CONFIG)?
            .unwrap_or_default())
    }
}

fn non_empty<'a>(doc: &'a Map<String, Value>, key: &str) -> Option<&'a str> {
    doc.get(key)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
}

impl SiteStore for SlackConfigStore {
    fn load_site(&self) -> Result<Option<SiteInfo>, StoreError> {
        let doc = self.document()?;
        Ok(non_empty(&doc, CLOUD_ID_KEY)
            .zip(non_empty(&doc, SITE_URL_KEY))
            .map(|(cloud_id, site_url)| SiteInfo::new(cloud_id, site_url)))
    }

    fn save_site(&self, site: &SiteInfo) -> Result<(), StoreError> {
        let _guard = self
            .write_lock
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        let mut doc = self.document()?;
        doc.insert(CLOUD_ID_KEY.to_string(), Value::String(site.cloud_id.clone()));
        doc.insert(SITE_URL_KEY.to_string(), Value::String(site.site_url.clone()));
        self.folder.write(documents::SLACK_CONFIG, &doc)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_no_site_before_discovery() {
        let dir = tempfile::tempdir().unwrap();
        let folder = SharedFolder::new(dir.path());
        folder
            .write(documents::SLACK_CONFIG, &json!({"SLACK_BOT_TOKEN": "xoxb"}))
            .unwrap();
        let store = SlackConfigStore::new(folder);

        assert_eq!(store.load_site().unwrap(), None);
    }

    #[test]
    fn test_save_site_keeps_other_keys() {
        let dir = tempfile::tempdir().unwrap();
        let folder = SharedFolder::new(dir.path());
        folder
            .write(
                documents::SLACK_CONFIG,
                &json!({"SLACK_BOT_TOKEN": "xoxb", "JIRA_CLIENT_ID": "cid"}),
            )
            .unwrap();
        let store = SlackConfigStore::new(folder.clone());

        let site = SiteInfo::new("cloud-1", "https://acme.atlassian.net");
        store.save_site(&site).unwrap();

        assert_eq!(store.load_site().unwrap(), Some(site));
        let doc: Value = folder.read(documents::SLACK_CONFIG).unwrap();
        assert_eq!(doc["SLACK_BOT_TOKEN"], "xoxb");
        assert_eq!(doc["JIRA_CLIENT_ID"], "cid");
        assert_eq!(doc["JIRA_CLOUD_ID"], "cloud-1");
    }

    #[test]
    fn test_save_site_creates_missing_document() {
        let dir = tempfile::tempdir().unwrap();
        let store = SlackConfigStore::new(SharedFolder::new(dir.path()));

        store
            .save_site(&SiteInfo::new("c", "https://x.atlassian.net"))
            .unwrap();
        assert!(store.load_site().unwrap().is_some());
    }
}
