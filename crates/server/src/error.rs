//! Structured errors for the bizsync MCP server.

use rmcp::model::{ErrorCode, ErrorData as McpError};

/// Errors raised by the tool layer itself, outside the sync engine.
#[derive(Debug, thiserror::Error)]
pub enum ToolError {
    /// Invalid input parameters (e.g., empty business id).
    #[error("INVALID_INPUT: {0}")]
    InvalidInput(String),

    /// Tool output could not be serialized.
    #[error("SERIALIZE_FAILED: {0}")]
    Serialize(String),
}

impl From<ToolError> for McpError {
    fn from(err: ToolError) -> Self {
        let (code, message) = match &err {
            ToolError::InvalidInput(msg) => (-32602, msg.clone()),
            ToolError::Serialize(msg) => (-32000, msg.clone()),
        };

        McpError { code: ErrorCode(code), message: message.into(), data: None }
    }
}
