//! Application layer for mcp-agent
//!
//! This crate contains use cases, port definitions, and application configuration.
//! It depends only on the domain layer.

pub mod config;
pub mod ports;
pub mod use_cases;

// Re-export commonly used types
pub use config::ExecutionParams;
pub use ports::{
    llm_backend::{BackendError, LlmBackend},
    run_progress::{NoRunProgress, RunProgressNotifier},
    tool_server::{ToolServer, ToolServerError},
};
pub use use_cases::discover_tools::{DiscoveryPolicy, ToolDiscoveryError, ToolRegistry};
pub use use_cases::invoke_tool::ToolInvocationGateway;
pub use use_cases::run_agent::{
    RunAgentError, RunAgentInput, RunAgentOutput, RunAgentUseCase, ValidationError,
};
