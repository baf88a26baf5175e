//! Application configuration with layered loading.
//!
//! This module provides configuration management using figment for layered
//! configuration loading from multiple sources:
//!
//! 1. Environment variables (BIZSYNC_*)
//! 2. TOML config file (if BIZSYNC_CONFIG_FILE set)
//! 3. Built-in defaults

use std::path::PathBuf;
use std::time::Duration;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};

mod validation;

pub use validation::ConfigError;

/// Application configuration with layered loading.
///
/// Loading precedence (highest wins):
/// 1. Environment variables (BIZSYNC_*)
/// 2. TOML config file (if BIZSYNC_CONFIG_FILE set)
/// 3. Built-in defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Path to the SQLite local store.
    ///
    /// Set via BIZSYNC_DB_PATH environment variable.
    #[serde(default = "default_db_path")]
    pub db_path: PathBuf,

    /// Base URL of the remote data service.
    ///
    /// Set via BIZSYNC_REMOTE_URL environment variable.
    #[serde(default = "default_remote_url")]
    pub remote_url: String,

    /// Anonymous API key sent with every remote request.
    ///
    /// Set via BIZSYNC_API_KEY environment variable.
    /// Required only when the remote is contacted.
    #[serde(default)]
    pub api_key: Option<String>,

    /// User-Agent string for HTTP requests.
    ///
    /// Set via BIZSYNC_USER_AGENT environment variable.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// HTTP request timeout in milliseconds.
    ///
    /// Set via BIZSYNC_TIMEOUT_MS environment variable.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// Refresh the local version record after each applied change event.
    ///
    /// Set via BIZSYNC_REFRESH_VERSION_ON_EVENT environment variable.
    #[serde(default = "default_true")]
    pub refresh_version_on_event: bool,

    /// Buffered events per change feed subscription.
    ///
    /// Set via BIZSYNC_FEED_BUFFER environment variable.
    #[serde(default = "default_feed_buffer")]
    pub feed_buffer: usize,
}

fn default_db_path() -> PathBuf {
    PathBuf::from("./bizsync-cache.sqlite")
}

fn default_remote_url() -> String {
    "http://localhost:54321".into()
}

fn default_user_agent() -> String {
    "bizsync/0.1".into()
}

fn default_timeout_ms() -> u64 {
    20_000
}

fn default_true() -> bool {
    true
}

fn default_feed_buffer() -> usize {
    64
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            db_path: default_db_path(),
            remote_url: default_remote_url(),
            api_key: None,
            user_agent: default_user_agent(),
            timeout_ms: default_timeout_ms(),
            refresh_version_on_event: true,
            feed_buffer: default_feed_buffer(),
        }
    }
}

impl AppConfig {
    /// Timeout as Duration for use with reqwest/tokio.
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Load configuration from all sources with layered precedence.
    ///
    /// Priority (highest wins):
    /// 1. Environment variables prefixed with `BIZSYNC_`
    /// 2. TOML file from `BIZSYNC_CONFIG_FILE` (if set)
    /// 3. Built-in defaults via `Default::default()`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if:
    /// - Configuration file cannot be read
    /// - Environment variables cannot be parsed
    /// - Validation fails after loading
    pub fn load() -> Result<Self, ConfigError> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Ok(config_path) = std::env::var("BIZSYNC_CONFIG_FILE") {
            figment = figment.merge(Toml::file(&config_path));
        }

        figment = figment.merge(
            Env::prefixed("BIZSYNC_")
                .ignore(&["CONFIG_FILE"])
                .map(|key| key.as_str().to_lowercase().into())
                .split("__"),
        );

        let config: Self = figment.extract().map_err(|e| ConfigError::LoadFailed(e.to_string()))?;

        config.validate()?;

        Ok(config)
    }

    /// Check if the API key is available (for deferred validation).
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Missing` if the API key is not set.
    pub fn require_api_key(&self) -> Result<&str, ConfigError> {
        self.api_key.as_deref().filter(|key| !key.trim().is_empty()).ok_or_else(|| ConfigError::Missing {
            field: "api_key".into(),
            hint: "Set BIZSYNC_API_KEY environment variable".into(),
        })
    }
}
