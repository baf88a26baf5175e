//! cache_purge tool implementation.
//!
//! Clears every cached collection and the version record.

use bizsync_core::SyncEngine;
use rmcp::{ErrorData as McpError, model::CallToolResult};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::tools::json_result;

/// Output from the cache_purge tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CachePurgeOutput {
    /// Number of entries deleted.
    pub deleted: u64,
}

/// Implementation of the cache_purge tool.
pub async fn purge_impl(engine: &SyncEngine) -> Result<CallToolResult, McpError> {
    let deleted = engine.purge().await?;
    json_result(&CachePurgeOutput { deleted })
}
