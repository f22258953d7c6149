//! Configuration file loading for mcp-agent
//!
//! This module handles file I/O and merging of configuration from multiple sources.
//! The priority order (highest to lowest):
//!
//! 1. Legacy flat environment variables (`LLM_CHOICE`, `OLLAMA_MODEL`, ...)
//! 2. `MCP_AGENT_*` environment variables
//! 3. `--config <path>` specified file
//! 4. Project root: `./mcp-agent.toml` or `./.mcp-agent.toml`
//! 5. XDG config: `$XDG_CONFIG_HOME/mcp-agent/config.toml`
//! 6. Default values
//!
//! CLI flags (`--bind`, `--port`) are applied on top by the binary.

mod file_config;
mod loader;

pub use file_config::{
    FileAgentConfig, FileBackendConfig, FileConfig, FileOllamaConfig, FileOpenAiConfig,
    FileServerConfig, FileToolsConfig, mask_secret,
};
pub use loader::{ConfigError, ConfigLoader};
