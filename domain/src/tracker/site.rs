//! Tracker site discovered after connecting

use serde::{Deserialize, Serialize};

/// Cloud id and base URL of the connected tracker site
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SiteInfo {
    pub cloud_id: String,
    pub site_url: String,
}

impl SiteInfo {
    pub fn new(cloud_id: impl Into<String>, site_url: impl Into<String>) -> Self {
        Self {
            cloud_id: cloud_id.into(),
            site_url: site_url.into(),
        }
    }

    /// Human-facing URL of an issue: `{site_url}/browse/{key}`
    pub fn browse_url(&self, key: &str) -> String {
        format!("{}/browse/{}", self.site_url.trim_end_matches('/'), key)
    }
}
