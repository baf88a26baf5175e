//! smart_sync tool implementation.
//!
//! Runs one cache-first, version-gated sync against the remote.

use bizsync_core::sync::SyncWarning;
use bizsync_core::{LocalVersionRecord, SyncAction, SyncEngine};
use rmcp::{ErrorData as McpError, model::CallToolResult};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::json_result;

/// Output from the smart_sync tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct SmartSyncOutput {
    /// What the sync decided to do.
    pub action: SyncAction,
    /// True when the served data came from the local cache.
    pub from_cache: bool,
    /// True when the served data may be out of date.
    pub stale: bool,
    /// Why the data may be stale.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
    /// Number of businesses now served.
    pub businesses: usize,
    /// Number of categories now served.
    pub categories: usize,
    /// Version record after the sync.
    #[serde(default)]
    pub version: Option<LocalVersionRecord>,
}

fn describe(warning: &SyncWarning) -> String {
    match warning {
        SyncWarning::VersionCheckFailed(reason) => format!("version check failed: {reason}"),
        SyncWarning::FullFetchFailed(reason) => format!("full fetch failed: {reason}"),
        SyncWarning::PersistFailed(reason) => format!("could not save to local store: {reason}"),
    }
}

/// Implementation of the smart_sync tool.
pub async fn smart_sync_impl(engine: &SyncEngine) -> Result<CallToolResult, McpError> {
    let outcome = engine.smart_sync().await?;

    let output = SmartSyncOutput {
        action: outcome.action,
        from_cache: outcome.from_cache,
        stale: outcome.is_stale(),
        warning: outcome.warning.as_ref().map(describe),
        businesses: outcome.dataset.businesses.len(),
        categories: outcome.dataset.categories.len(),
        version: engine.store().get_version().await,
    };

    json_result(&output)
}
