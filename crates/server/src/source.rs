//! Remote source selection for the server binary.

use std::sync::Arc;

use bizsync_client::{RestConfig, RestSource};
use bizsync_core::{AppConfig, Dataset, Error, RemoteSource, VersionDescriptor};

/// Stand-in remote used when no remote is configured.
///
/// Every call fails, so smart sync serves the local cache.
#[derive(Debug, Clone)]
pub struct UnavailableSource {
    reason: String,
}

impl UnavailableSource {
    pub fn new(reason: impl Into<String>) -> Self {
        Self { reason: reason.into() }
    }
}

#[async_trait::async_trait]
impl RemoteSource for UnavailableSource {
    async fn fetch_remote_version(&self) -> Result<VersionDescriptor, Error> {
        Err(Error::Remote(self.reason.clone()))
    }

    async fn fetch_full_dataset(&self) -> Result<Dataset, Error> {
        Err(Error::Remote(self.reason.clone()))
    }
}

/// Build the REST source, or an offline stand-in if it cannot be configured.
pub fn build(config: &AppConfig) -> Arc<dyn RemoteSource> {
    match RestConfig::from_app_config(config).and_then(RestSource::new) {
        Ok(source) => Arc::new(source),
        Err(e) => {
            tracing::warn!(error = %e, "remote not configured, serving local cache only");
            Arc::new(UnavailableSource::new(e.to_string()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_missing_key_builds_offline_source() {
        let source = build(&AppConfig::default());
        let result = source.fetch_remote_version().await;
        assert!(matches!(result, Err(Error::Remote(msg)) if msg.contains("API key")));
    }
}
