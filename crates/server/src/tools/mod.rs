//! MCP tool implementations.
//!
//! This module contains all tools exposed by the bizsync-mcp server.
#![allow(unused_imports)]

pub mod cache;
pub mod cached;
pub mod feed;
pub mod mutate;
pub mod sync;

use rmcp::{
    ErrorData as McpError,
    model::{CallToolResult, Content},
};
use serde::Serialize;

use crate::error::ToolError;

pub use cache::{CacheInfoOutput, CachePurgeOutput};
pub use cached::{BusinessListParams, GetBusinessParams};
pub use feed::ApplyChangeParams;
pub use mutate::{DeleteBusinessParams, UpdateBusinessParams};
pub use sync::SmartSyncOutput;

/// Serialize a tool output as pretty JSON text content.
pub(crate) fn json_result<T: Serialize>(output: &T) -> Result<CallToolResult, McpError> {
    let json = serde_json::to_string_pretty(output).map_err(|e| ToolError::Serialize(e.to_string()))?;
    Ok(CallToolResult::success(vec![Content::text(json)]))
}
