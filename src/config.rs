use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;

use crate::utils::paths::get_config_path;

pub const SERVER_URL_ENV: &str = "TASKSYNC_SERVER_URL";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Base URL of the backend serving `/save-tasks/` and friends.
    #[serde(default = "default_server_url")]
    pub server_url: String,

    #[serde(default = "default_theme")]
    pub theme: String,

    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// When false, mutations are only written locally.
    #[serde(default = "default_sync_enabled")]
    pub sync_enabled: bool,

    /// Fixed CSRF token. When unset it is read from the server's cookie.
    #[serde(default)]
    pub csrf_token: Option<String>,
}

fn default_server_url() -> String {
    "http://127.0.0.1:8000".to_string()
}

fn default_theme() -> String {
    "default".to_string()
}

fn default_request_timeout_secs() -> u64 {
    10
}

fn default_sync_enabled() -> bool {
    true
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_url: default_server_url(),
            theme: default_theme(),
            request_timeout_secs: default_request_timeout_secs(),
            sync_enabled: default_sync_enabled(),
            csrf_token: None,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let config_path = get_config_path()?;

        let mut config = if config_path.exists() {
            let content = fs::read_to_string(&config_path)
                .with_context(|| format!("Failed to read {}", config_path.display()))?;
            Self::parse(&content)?
        } else {
            Config::default()
        };

        config.apply_env_overrides();
        Ok(config)
    }

    pub fn parse(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse config.toml")
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(url) = env::var(SERVER_URL_ENV)
            && !url.trim().is_empty()
        {
            self.server_url = url.trim().to_string();
        }
    }
}
