//! LLM Backend port
//!
//! Defines the interface for consulting a chat model with the conversation so
//! far and the tool catalog. Adapters translate to and from a provider wire
//! format and must hand back a resolved [`Outcome`].

use async_trait::async_trait;
use mcp_agent_domain::{BackendFailure, Conversation, DomainError, Outcome, ToolCatalog};
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur during a backend consultation
#[derive(Error, Debug)]
pub enum BackendError {
    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Backend returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Malformed response: {0}")]
    Malformed(String),

    #[error("Timed out after {0:?}")]
    Timeout(Duration),
}

impl BackendError {
    /// Classify for the run's terminal failure.
    pub fn failure(&self) -> BackendFailure {
        match self {
            BackendError::Transport(_) => BackendFailure::Unreachable,
            BackendError::Status { status, .. } => BackendFailure::Rejected { status: *status },
            BackendError::Malformed(_) => BackendFailure::Malformed,
            BackendError::Timeout(_) => BackendFailure::Timeout,
        }
    }
}

impl From<DomainError> for BackendError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::MalformedResponse(msg) => BackendError::Malformed(msg),
            other => BackendError::Malformed(other.to_string()),
        }
    }
}

/// A chat model that can request tool calls.
///
/// Implementations are stateless with respect to runs: the whole conversation
/// is sent on every call.
#[async_trait]
pub trait LlmBackend: Send + Sync {
    /// Short backend identifier, e.g. `ollama`
    fn name(&self) -> &str;

    /// Model identifier sent to the provider
    fn model(&self) -> &str;

    /// Consult the model once.
    async fn complete(
        &self,
        conversation: &Conversation,
        tools: &ToolCatalog,
    ) -> Result<Outcome, BackendError>;
}
