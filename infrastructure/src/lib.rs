//! Infrastructure layer for mcp-agent
//!
//! This crate contains adapters that implement the ports defined in the
//! application layer: LLM backends, the MCP tool server client, and
//! configuration file loading.

pub mod backends;
pub mod config;
pub mod mcp;

// Re-export commonly used types
pub use backends::{BackendKind, OllamaBackend, OpenAiBackend, SamplingOptions, build_backend};
pub use config::{
    ConfigError, ConfigLoader, FileAgentConfig, FileBackendConfig, FileConfig, FileServerConfig,
    FileToolsConfig, mask_secret,
};
pub use mcp::{McpClient, McpError};
