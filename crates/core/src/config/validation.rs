//! Configuration validation rules.
//!
//! This module provides validation logic for `AppConfig` values
//! after they have been loaded from environment, files, or defaults.

use crate::config::AppConfig;
use thiserror::Error;

/// Configuration validation errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    LoadFailed(String),

    #[error("invalid configuration: {field} - {reason}")]
    Invalid { field: String, reason: String },

    #[error("missing required configuration: {field} ({hint})")]
    Missing { field: String, hint: String },
}

impl AppConfig {
    /// Validate configuration values after loading.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` if:
    /// - `timeout_ms` is less than 100ms or exceeds 5 minutes
    /// - `user_agent` is empty
    /// - `feed_buffer` is 0 or exceeds 10000
    /// - `remote_url` is not an absolute http(s) URL
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.timeout_ms < 100 {
            return Err(ConfigError::Invalid { field: "timeout_ms".into(), reason: "must be at least 100ms".into() });
        }
        if self.timeout_ms > 300_000 {
            return Err(ConfigError::Invalid {
                field: "timeout_ms".into(),
                reason: "must not exceed 5 minutes (300000ms)".into(),
            });
        }

        if self.user_agent.trim().is_empty() {
            return Err(ConfigError::Invalid { field: "user_agent".into(), reason: "must not be empty".into() });
        }

        if self.feed_buffer == 0 || self.feed_buffer > 10_000 {
            return Err(ConfigError::Invalid {
                field: "feed_buffer".into(),
                reason: "must be between 1 and 10000".into(),
            });
        }

        match url::Url::parse(&self.remote_url) {
            Ok(url) if matches!(url.scheme(), "http" | "https") && url.has_host() => {}
            Ok(url) => {
                return Err(ConfigError::Invalid {
                    field: "remote_url".into(),
                    reason: format!("unsupported scheme '{}'", url.scheme()),
                });
            }
            Err(e) => {
                return Err(ConfigError::Invalid { field: "remote_url".into(), reason: e.to_string() });
            }
        }

        if !self.refresh_version_on_event {
            tracing::debug!("version refresh after change events is disabled");
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_default_config() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_timeout_too_small() {
        let config = AppConfig { timeout_ms: 50, ..Default::default() };
        let result = config.validate();
        assert!(matches!(result, Err(ConfigError::Invalid { field, .. }) if field == "timeout_ms"));
    }

    #[test]
    fn test_validate_timeout_exceeds_limit() {
        let config = AppConfig { timeout_ms: 301_000, ..Default::default() };
        let result = config.validate();
        assert!(matches!(result, Err(ConfigError::Invalid { field, .. }) if field == "timeout_ms"));
    }

    #[test]
    fn test_validate_empty_user_agent() {
        let config = AppConfig { user_agent: String::new(), ..Default::default() };
        let result = config.validate();
        assert!(matches!(result, Err(ConfigError::Invalid { field, .. }) if field == "user_agent"));
    }

    #[test]
    fn test_validate_feed_buffer_bounds() {
        let zero = AppConfig { feed_buffer: 0, ..Default::default() };
        assert!(matches!(zero.validate(), Err(ConfigError::Invalid { field, .. }) if field == "feed_buffer"));

        let huge = AppConfig { feed_buffer: 10_001, ..Default::default() };
        assert!(matches!(huge.validate(), Err(ConfigError::Invalid { field, .. }) if field == "feed_buffer"));
    }

    #[test]
    fn test_validate_remote_url() {
        let garbage = AppConfig { remote_url: "not a url".into(), ..Default::default() };
        assert!(matches!(garbage.validate(), Err(ConfigError::Invalid { field, .. }) if field == "remote_url"));

        let ftp = AppConfig { remote_url: "ftp://example.com".into(), ..Default::default() };
        assert!(matches!(ftp.validate(), Err(ConfigError::Invalid { field, .. }) if field == "remote_url"));
    }

    #[test]
    fn test_validate_edge_case_values() {
        let config = AppConfig { timeout_ms: 100, feed_buffer: 1, ..Default::default() };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_max_values() {
        let config = AppConfig { timeout_ms: 300_000, feed_buffer: 10_000, ..Default::default() };
        assert!(config.validate().is_ok());
    }
}
