//! Cached read tools: cached_businesses, cached_categories, get_business.
//!
//! These never contact the remote.

use bizsync_core::{Business, Category, Dataset, Error, SyncEngine};
use rmcp::{ErrorData as McpError, model::CallToolResult};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::json_result;
use crate::error::ToolError;

/// Parameters for the cached_businesses tool.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct BusinessListParams {
    /// Only return businesses in this category id.
    #[serde(default)]
    pub category: Option<String>,
}

/// Output from the cached_businesses tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct BusinessListOutput {
    pub businesses: Vec<Business>,
}

/// Output from the cached_categories tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CategoryListOutput {
    /// Categories sorted by display name.
    pub categories: Vec<Category>,
}

/// Parameters for the get_business tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct GetBusinessParams {
    /// Business id, as carried by a shared link.
    pub id: String,
}

/// Implementation of the cached_businesses tool.
pub async fn businesses_impl(engine: &SyncEngine, params: BusinessListParams) -> Result<CallToolResult, McpError> {
    let mut businesses = engine.cached_businesses().await;

    if let Some(category) = params.category.as_deref().map(str::trim).filter(|c| !c.is_empty()) {
        businesses.retain(|b| b.category == category);
    }

    json_result(&BusinessListOutput { businesses })
}

/// Implementation of the cached_categories tool.
pub async fn categories_impl(engine: &SyncEngine) -> Result<CallToolResult, McpError> {
    let categories = Dataset::new(engine.cached_categories().await, Vec::new()).sorted_categories();
    json_result(&CategoryListOutput { categories })
}

/// Implementation of the get_business tool.
///
/// Looks in the working copy first, then the local store.
pub async fn get_business_impl(engine: &SyncEngine, params: GetBusinessParams) -> Result<CallToolResult, McpError> {
    let id = params.id.trim();
    if id.is_empty() {
        return Err(ToolError::InvalidInput("id cannot be empty".into()).into());
    }

    let business = match engine.working().business(id).await {
        Some(business) => business,
        None => engine
            .cached_businesses()
            .await
            .into_iter()
            .find(|b| b.id == id)
            .ok_or_else(|| Error::NotFound(format!("business {id}")))?,
    };

    json_result(&business)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::testing::{engine, output, synced_engine};

    #[tokio::test]
    async fn test_businesses_filtered_by_category() {
        let engine = synced_engine().await;

        let all: BusinessListOutput = output(&businesses_impl(&engine, BusinessListParams::default()).await.unwrap());
        assert_eq!(all.businesses.len(), 2);

        let params = BusinessListParams { category: Some("c2".into()) };
        let tailoring: BusinessListOutput = output(&businesses_impl(&engine, params).await.unwrap());
        assert_eq!(tailoring.businesses.len(), 1);
        assert_eq!(tailoring.businesses[0].id, "b2");
    }

    #[tokio::test]
    async fn test_empty_cache_lists_nothing() {
        let engine = engine().await;
        let all: BusinessListOutput = output(&businesses_impl(&engine, BusinessListParams::default()).await.unwrap());
        assert!(all.businesses.is_empty());
    }

    #[tokio::test]
    async fn test_categories_sorted_by_name() {
        let engine = synced_engine().await;
        let result: CategoryListOutput = output(&categories_impl(&engine).await.unwrap());
        let names: Vec<&str> = result.categories.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Food", "Tailoring"]);
    }

    #[tokio::test]
    async fn test_get_business() {
        let engine = synced_engine().await;

        let found: Business = output(&get_business_impl(&engine, GetBusinessParams { id: "b1".into() }).await.unwrap());
        assert_eq!(found.shop_name, "Bakery");

        let missing = get_business_impl(&engine, GetBusinessParams { id: "nope".into() }).await;
        assert!(missing.is_err());

        let blank = get_business_impl(&engine, GetBusinessParams { id: " ".into() }).await;
        assert!(blank.is_err());
    }
}
