//! cache_info tool implementation.
//!
//! Reports collection sizes and the local version record.

use bizsync_core::{LocalVersionRecord, SyncEngine};
use rmcp::{ErrorData as McpError, model::CallToolResult};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::tools::json_result;

/// Output from the cache_info tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CacheInfoOutput {
    pub businesses: usize,
    pub categories: usize,
    /// Absent before the first successful full sync.
    #[serde(default)]
    pub version: Option<LocalVersionRecord>,
}

/// Implementation of the cache_info tool.
pub async fn info_impl(engine: &SyncEngine) -> Result<CallToolResult, McpError> {
    let info = engine.cache_info().await;
    json_result(&CacheInfoOutput { businesses: info.businesses, categories: info.categories, version: info.version })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::testing::{engine, output, synced_engine};

    #[tokio::test]
    async fn test_info_empty() {
        let engine = engine().await;
        let info: CacheInfoOutput = output(&info_impl(&engine).await.unwrap());
        assert_eq!(info.businesses, 0);
        assert!(info.version.is_none());
    }

    #[tokio::test]
    async fn test_info_after_sync() {
        let engine = synced_engine().await;
        let info: CacheInfoOutput = output(&info_impl(&engine).await.unwrap());
        assert_eq!(info.businesses, 2);
        assert_eq!(info.categories, 2);
        assert_eq!(info.version.unwrap().version_token, "v1");
    }
}
