//! apply_change tool implementation.
//!
//! Decodes a realtime payload and pushes it into the ordered change feed.
//! Events are applied by the background patch applier in push order.

use bizsync_client::RealtimePayload;
use bizsync_core::{ChangeEvent, EntityKind, Error, sync::FeedSender};
use rmcp::{ErrorData as McpError, model::CallToolResult};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::json_result;

/// Parameters for the apply_change tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ApplyChangeParams {
    /// Realtime payload: `{ "eventType": "INSERT|UPDATE|DELETE", "table", "new", "old" }`.
    pub payload: serde_json::Value,
}

/// Output from the apply_change tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ApplyChangeOutput {
    pub operation: String,
    pub kind: EntityKind,
    pub id: String,
    /// The event was accepted by the feed; it is applied asynchronously.
    pub queued: bool,
}

/// Implementation of the apply_change tool.
pub async fn apply_change_impl(feed: &FeedSender, params: ApplyChangeParams) -> Result<CallToolResult, McpError> {
    let payload: RealtimePayload =
        serde_json::from_value(params.payload).map_err(|e| Error::Decode(e.to_string()))?;
    let event = ChangeEvent::try_from(payload)?;

    let output = ApplyChangeOutput {
        operation: event.operation().to_string(),
        kind: event.kind(),
        id: event.id().to_string(),
        queued: true,
    };

    feed.push(event).await?;
    json_result(&output)
}
