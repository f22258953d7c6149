//! MCP tool server adapter (streamable HTTP transport)

pub mod client;
pub mod error;
pub mod protocol;

pub use client::McpClient;
pub use error::McpError;
