//! MCP server handler implementation.
//!
//! This module defines the main server handler that
//! routes tool calls to the appropriate implementations.
use crate::tools::{
    ApplyChangeParams, BusinessListParams, DeleteBusinessParams, GetBusinessParams, UpdateBusinessParams, cache,
    cached, feed, mutate, sync,
};

use bizsync_core::{SyncEngine, sync::FeedSender};
use rmcp::{
    ErrorData as McpError, ServerHandler,
    handler::server::{
        tool::{ToolCallContext, ToolRouter},
        wrapper::Parameters,
    },
    model::{
        CallToolRequestParam, CallToolResult, Implementation, ListToolsResult, PaginatedRequestParam, ProtocolVersion,
        ServerCapabilities, ServerInfo,
    },
    service::{RequestContext, RoleServer},
    tool, tool_router,
};

/// The main MCP server handler for bizsync.
#[derive(Clone)]
pub struct BizsyncServer {
    engine: SyncEngine,
    feed: FeedSender,
    tool_router: ToolRouter<Self>,
}

/// Tool router implementation using the #[tool_router] macro.
///
/// This macro generates the routing logic that maps tool names to handler methods.
#[tool_router]
impl BizsyncServer {
    /// Create a new server handler around a running engine and its change feed.
    pub fn new(engine: SyncEngine, feed: FeedSender) -> Self {
        Self { engine, feed, tool_router: Self::tool_router() }
    }

    #[tool(
        description = "Cache-first sync. Serves the local cache, checks the remote data version, and refetches everything only when it changed."
    )]
    async fn smart_sync(&self) -> Result<CallToolResult, McpError> {
        sync::smart_sync_impl(&self.engine).await
    }

    #[tool(description = "List cached businesses without contacting the remote. Optionally filter by category id.")]
    async fn cached_businesses(&self, params: Parameters<BusinessListParams>) -> Result<CallToolResult, McpError> {
        cached::businesses_impl(&self.engine, params.0).await
    }

    #[tool(description = "List cached categories sorted by name, without contacting the remote.")]
    async fn cached_categories(&self) -> Result<CallToolResult, McpError> {
        cached::categories_impl(&self.engine).await
    }

    #[tool(description = "Look up one cached business by id.")]
    async fn get_business(&self, params: Parameters<GetBusinessParams>) -> Result<CallToolResult, McpError> {
        cached::get_business_impl(&self.engine, params.0).await
    }

    #[tool(description = "Insert or replace a business in the local cache and the served view.")]
    async fn update_cached_business(
        &self, params: Parameters<UpdateBusinessParams>,
    ) -> Result<CallToolResult, McpError> {
        mutate::update_impl(&self.engine, params.0).await
    }

    #[tool(description = "Remove a business from the local cache and the served view. Missing ids are ignored.")]
    async fn delete_cached_business(
        &self, params: Parameters<DeleteBusinessParams>,
    ) -> Result<CallToolResult, McpError> {
        mutate::delete_impl(&self.engine, params.0).await
    }

    #[tool(
        description = "Queue a realtime change payload (eventType, table, new, old). Changes are applied in the order received."
    )]
    async fn apply_change(&self, params: Parameters<ApplyChangeParams>) -> Result<CallToolResult, McpError> {
        feed::apply_change_impl(&self.feed, params.0).await
    }

    #[tool(description = "Report cached collection sizes and the local data version.")]
    async fn cache_info(&self) -> Result<CallToolResult, McpError> {
        cache::info_impl(&self.engine).await
    }

    #[tool(description = "Delete the local cache. The next smart_sync performs a full fetch.")]
    async fn cache_purge(&self) -> Result<CallToolResult, McpError> {
        cache::purge_impl(&self.engine).await
    }
}

impl ServerHandler for BizsyncServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            server_info: Implementation {
                name: "bizsync-mcp".into(),
                version: env!("CARGO_PKG_VERSION").into(),
                ..Default::default()
            },
            protocol_version: ProtocolVersion::LATEST,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }

    async fn list_tools(
        &self, _request: Option<PaginatedRequestParam>, _context: RequestContext<RoleServer>,
    ) -> Result<ListToolsResult, rmcp::model::ErrorData> {
        Ok(ListToolsResult { meta: None, tools: self.tool_router.list_all(), next_cursor: None })
    }

    async fn call_tool(
        &self, request: CallToolRequestParam, context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, rmcp::model::ErrorData> {
        self.tool_router
            .call(ToolCallContext::new(self, request, context))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::testing::engine;

    #[tokio::test]
    async fn test_lists_every_tool() {
        let engine = engine().await;
        let feed = engine.subscribe(1);
        let server = BizsyncServer::new(engine, feed.sender.clone());

        let mut names: Vec<String> = server.tool_router.list_all().into_iter().map(|t| t.name.to_string()).collect();
        names.sort();
        assert_eq!(
            names,
            vec![
                "apply_change",
                "cache_info",
                "cache_purge",
                "cached_businesses",
                "cached_categories",
                "delete_cached_business",
                "get_business",
                "smart_sync",
                "update_cached_business",
            ]
        );
    }
}
