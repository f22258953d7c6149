//! Error types for the MCP client

use mcp_agent_application::ToolServerError;
use thiserror::Error;

/// Result type alias for MCP operations
pub type Result<T> = std::result::Result<T, McpError>;

/// Errors that can occur when talking to an MCP server
#[derive(Error, Debug)]
pub enum McpError {
    #[error("HTTP transport error: {0}")]
    Transport(String),

    #[error("Request timeout")]
    Timeout,

    #[error("MCP server returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("MCP session expired")]
    SessionExpired,

    #[error("JSON serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("JSON-RPC error (code {code}): {message}")]
    Rpc { code: i64, message: String },

    #[error("Unexpected response: {0}")]
    UnexpectedResponse(String),

    #[error("Invalid tool definition '{name}': {reason}")]
    InvalidTool { name: String, reason: String },

    #[error("{0}")]
    ToolReported(String),
}

impl From<reqwest::Error> for McpError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            McpError::Timeout
        } else {
            McpError::Transport(err.to_string())
        }
    }
}

impl From<McpError> for ToolServerError {
    fn from(err: McpError) -> Self {
        match err {
            McpError::Transport(msg) => ToolServerError::Transport(msg),
            McpError::Timeout => ToolServerError::Timeout,
            McpError::Status { status, .. } => ToolServerError::Status { status },
            McpError::ToolReported(msg) => ToolServerError::ToolReported(msg),
            other => ToolServerError::Protocol(other.to_string()),
        }
    }
}
