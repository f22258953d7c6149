//! Tool Server port
//!
//! Defines the interface to the remote tool server: listing the tools it
//! publishes and invoking one by name.

use async_trait::async_trait;
use mcp_agent_domain::{ToolDescriptor, ToolError};
use thiserror::Error;

/// Errors returned by a tool server adapter
#[derive(Error, Debug)]
pub enum ToolServerError {
    #[error("Tool server unreachable: {0}")]
    Transport(String),

    #[error("Tool server returned HTTP {status}")]
    Status { status: u16 },

    #[error("Protocol error: {0}")]
    Protocol(String),

    /// The tool ran and reported a failure of its own
    #[error("{0}")]
    ToolReported(String),

    #[error("Tool server timed out")]
    Timeout,
}

impl ToolServerError {
    /// Convert into the error appended to the conversation for `tool_name`.
    pub fn into_tool_error(self, tool_name: &str) -> ToolError {
        match self {
            ToolServerError::ToolReported(msg) => ToolError::tool_reported(msg),
            ToolServerError::Timeout => ToolError::timeout(tool_name),
            ToolServerError::Status { status } => ToolError::execution_failed(format!(
                "tool server returned HTTP {} for {}",
                status, tool_name
            )),
            ToolServerError::Transport(_) => ToolError::execution_failed(format!(
                "tool server unreachable while calling {}",
                tool_name
            )),
            ToolServerError::Protocol(msg) => ToolError::execution_failed(format!(
                "invalid tool server response for {}",
                tool_name
            ))
            .with_details(msg),
        }
    }
}

/// Port for the remote tool server
///
/// Implementations (adapters) live in the infrastructure layer.
#[async_trait]
pub trait ToolServer: Send + Sync {
    /// Endpoint, for logs and health output
    fn endpoint(&self) -> &str;

    /// List every tool the server publishes.
    async fn list_tools(&self) -> Result<Vec<ToolDescriptor>, ToolServerError>;

    /// Invoke a tool and return its text output.
    async fn call_tool(
        &self,
        name: &str,
        arguments: &serde_json::Map<String, serde_json::Value>,
    ) -> Result<String, ToolServerError>;
}
