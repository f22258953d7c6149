//! Domain layer for mcp-agent
//!
//! This crate contains the core business logic, entities, and value objects.
//! It has no dependencies on infrastructure or presentation concerns.
//!
//! # Core Concepts
//!
//! - **Tool catalog**: the set of tools published by the MCP tool server,
//!   discovered once and read-only during request processing
//! - **Conversation**: the append-only message history replayed to the model
//!   on every turn
//! - **Agent run**: one request's control loop, alternating between LLM
//!   consultations and tool-call rounds until a final answer or a failure

pub mod agent;
pub mod core;
pub mod session;
pub mod tool;
pub mod util;

// Re-export commonly used types
pub use agent::{
    entities::{AgentPhase, AgentRun, RunStatus},
    validation::{ConfigIssue, ConfigIssueCode, Severity},
    value_objects::{BackendFailure, RunFailure, RunId},
};
pub use core::error::{DomainError, ErrorKind};
pub use session::{
    entities::{Conversation, Message, Role},
    response::{ContentBlock, LlmResponse, Outcome, StopReason},
};
pub use tool::{
    entities::{ParameterSchema, ToolCallRequest, ToolCatalog, ToolDescriptor, ToolParameter},
    traits::{DefaultToolValidator, ToolValidator},
    value_objects::{ToolCallResult, ToolError, ToolOutcome},
};
