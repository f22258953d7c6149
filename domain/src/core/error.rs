//! Domain error types

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Domain-level errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Duplicate tool name in catalog: {0}")]
    DuplicateTool(String),

    #[error("Invalid tool descriptor: {0}")]
    InvalidTool(String),

    #[error("Malformed model response: {0}")]
    MalformedResponse(String),

    #[error("Invalid run transition: {0}")]
    InvalidTransition(String),
}

/// Error taxonomy surfaced at the API boundary.
///
/// The serialized names are part of the public error payload
/// (`{"error_kind": "...", "message": "..."}`) and must stay stable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorKind {
    #[serde(rename = "ValidationError")]
    Validation,
    #[serde(rename = "ToolDiscoveryError")]
    ToolDiscovery,
    #[serde(rename = "LLMBackendError")]
    LlmBackend,
    #[serde(rename = "ToolInvocationError")]
    ToolInvocation,
    #[serde(rename = "IterationLimitExceeded")]
    IterationLimitExceeded,
    #[serde(rename = "Cancelled")]
    Cancelled,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::Validation => "ValidationError",
            ErrorKind::ToolDiscovery => "ToolDiscoveryError",
            ErrorKind::LlmBackend => "LLMBackendError",
            ErrorKind::ToolInvocation => "ToolInvocationError",
            ErrorKind::IterationLimitExceeded => "IterationLimitExceeded",
            ErrorKind::Cancelled => "Cancelled",
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
