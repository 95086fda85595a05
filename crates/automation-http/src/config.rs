use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::HttpError;

// ---------------------------------------------------------------------------
// BackendConfig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BackendConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default)]
    pub project_key: String,
    #[serde(default)]
    pub user_id: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_base_url() -> String {
    "https://api.qonversion.io".to_string()
}

fn default_timeout_secs() -> u64 {
    15
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            project_key: String::new(),
            user_id: String::new(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl BackendConfig {
    pub fn new(project_key: impl Into<String>, user_id: impl Into<String>) -> Self {
        Self {
            project_key: project_key.into(),
            user_id: user_id.into(),
            ..Self::default()
        }
    }

    /// Check required fields and return the parsed base URL.
    pub fn validate(&self) -> Result<Url, HttpError> {
        if self.project_key.trim().is_empty() {
            return Err(HttpError::Config("project_key is required".into()));
        }
        if self.user_id.trim().is_empty() {
            return Err(HttpError::Config("user_id is required".into()));
        }
        if self.timeout_secs == 0 {
            return Err(HttpError::Config("timeout_secs must be positive".into()));
        }
        let base = Url::parse(&self.base_url)
            .map_err(|e| HttpError::Config(format!("base_url '{}': {e}", self.base_url)))?;
        if base.cannot_be_a_base() || !matches!(base.scheme(), "http" | "https") {
            return Err(HttpError::Config(format!(
                "base_url '{}' is not an http(s) URL",
                self.base_url
            )));
        }
        Ok(base)
    }
}
