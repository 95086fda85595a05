use anyhow::Context;
use automation_http::BackendConfig;
use clap::Args;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIG_FILE: &str = "qon-automation.yaml";

// ---------------------------------------------------------------------------
// Backend flags
// ---------------------------------------------------------------------------

/// Flag/env overrides applied on top of the config file.
#[derive(Args, Debug, Default)]
pub struct BackendArgs {
    /// API base URL
    #[arg(long, global = true, env = "QON_BASE_URL")]
    pub base_url: Option<String>,

    /// Project key sent as the bearer token
    #[arg(long, global = true, env = "QON_PROJECT_KEY", hide_env_values = true)]
    pub project_key: Option<String>,

    /// User the automation requests are made for
    #[arg(long, global = true, env = "QON_USER_ID")]
    pub user_id: Option<String>,

    /// Path of the JSON store holding the push token
    #[arg(long, global = true, env = "QON_STORE")]
    pub store: Option<PathBuf>,
}

// ---------------------------------------------------------------------------
// CliConfig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CliConfig {
    #[serde(default)]
    pub backend: BackendConfig,
    #[serde(default = "default_store_path")]
    pub store_path: PathBuf,
}

fn default_store_path() -> PathBuf {
    PathBuf::from(".qon-automation").join("store.json")
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            backend: BackendConfig::default(),
            store_path: default_store_path(),
        }
    }
}

impl CliConfig {
    /// Load `explicit`, or `qon-automation.yaml` from the working directory
    /// when present, or fall back to defaults.
    pub fn load(explicit: Option<&Path>) -> anyhow::Result<Self> {
        match explicit {
            Some(path) => Self::read(path),
            None => {
                let path = Path::new(DEFAULT_CONFIG_FILE);
                if path.exists() {
                    Self::read(path)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    fn read(path: &Path) -> anyhow::Result<Self> {
        let data = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        serde_yaml::from_str(&data)
            .with_context(|| format!("failed to parse config {}", path.display()))
    }

    pub fn apply(&mut self, args: &BackendArgs) {
        if let Some(url) = &args.base_url {
            self.backend.base_url = url.clone();
        }
        if let Some(key) = &args.project_key {
            self.backend.project_key = key.clone();
        }
        if let Some(user) = &args.user_id {
            self.backend.user_id = user.clone();
        }
        if let Some(store) = &args.store {
            self.store_path = store.clone();
        }
    }
}
