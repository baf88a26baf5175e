//! update_cached_business and delete_cached_business tool implementations.
//!
//! Patch the local store and working copy in lockstep, as a change feed event would.

use bizsync_core::{Business, SyncEngine};
use rmcp::{ErrorData as McpError, model::CallToolResult};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::json_result;

/// Parameters for the update_cached_business tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct UpdateBusinessParams {
    /// The full business record. Replaces a cached record with the same id, or is added.
    pub business: Business,
}

/// Parameters for the delete_cached_business tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct DeleteBusinessParams {
    pub id: String,
}

/// Output from the mutation tools.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct MutationOutput {
    pub id: String,
    /// Cached business count after the patch.
    pub businesses: usize,
}

/// Implementation of the update_cached_business tool.
pub async fn update_impl(engine: &SyncEngine, params: UpdateBusinessParams) -> Result<CallToolResult, McpError> {
    let id = params.business.id.clone();
    engine.update_cached_business(params.business).await?;

    let businesses = engine.cached_businesses().await.len();
    json_result(&MutationOutput { id, businesses })
}

/// Implementation of the delete_cached_business tool.
pub async fn delete_impl(engine: &SyncEngine, params: DeleteBusinessParams) -> Result<CallToolResult, McpError> {
    engine.delete_cached_business(&params.id).await?;

    let businesses = engine.cached_businesses().await.len();
    json_result(&MutationOutput { id: params.id, businesses })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::testing::{business, output, synced_engine};

    #[tokio::test]
    async fn test_update_replaces_in_place() {
        let engine = synced_engine().await;
        let mut renamed = business("b1", "Bakery & Cafe", "c1");
        renamed.home_delivery = true;

        let result: MutationOutput = output(&update_impl(&engine, UpdateBusinessParams { business: renamed }).await.unwrap());
        assert_eq!(result.businesses, 2);

        let cached = engine.working().business("b1").await.unwrap();
        assert_eq!(cached.shop_name, "Bakery & Cafe");
        assert!(cached.home_delivery);
    }

    #[tokio::test]
    async fn test_delete_then_missing_delete_is_noop() {
        let engine = synced_engine().await;

        let first: MutationOutput = output(&delete_impl(&engine, DeleteBusinessParams { id: "b2".into() }).await.unwrap());
        assert_eq!(first.businesses, 1);

        let again: MutationOutput = output(&delete_impl(&engine, DeleteBusinessParams { id: "b2".into() }).await.unwrap());
        assert_eq!(again.businesses, 1);
    }

    #[tokio::test]
    async fn test_blank_id_rejected() {
        let engine = synced_engine().await;
        let result = update_impl(&engine, UpdateBusinessParams { business: business("", "Nameless", "c1") }).await;
        assert!(result.is_err());
    }
}
