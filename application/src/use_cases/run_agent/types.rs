//! Type definitions for the RunAgent use case.

use mcp_agent_domain::{AgentRun, Conversation, DomainError, RunFailure, RunId, RunStatus};
use thiserror::Error;

/// Rejection of an inbound request before any run is created
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("prompt must be a non-empty string")]
    EmptyPrompt,
}

/// Errors that escape the agent loop itself.
///
/// Backend, limit and cancellation failures are not errors here: they end the
/// run as `failed` and are reported through [`RunAgentOutput`]. This type only
/// signals a broken run invariant.
#[derive(Error, Debug)]
pub enum RunAgentError {
    #[error("Agent run reached an invalid state: {0}")]
    InvalidState(#[from] DomainError),
}

/// Input for the RunAgent use case
#[derive(Debug, Clone)]
pub struct RunAgentInput {
    pub run_id: RunId,
    /// The user's request
    pub prompt: String,
    /// Optional system instructions; blank is treated as absent
    pub instructions: Option<String>,
}

impl RunAgentInput {
    /// Validate the request and assign a fresh run id.
    pub fn new(
        prompt: impl Into<String>,
        instructions: Option<String>,
    ) -> Result<Self, ValidationError> {
        let prompt = prompt.into();
        if prompt.trim().is_empty() {
            return Err(ValidationError::EmptyPrompt);
        }
        Ok(Self {
            run_id: RunId::new(uuid::Uuid::new_v4().to_string()),
            prompt,
            instructions: instructions.filter(|i| !i.trim().is_empty()),
        })
    }

    pub fn with_run_id(mut self, run_id: RunId) -> Self {
        self.run_id = run_id;
        self
    }
}

/// Output from the RunAgent use case: the terminal state of one run
#[derive(Debug, Clone)]
pub struct RunAgentOutput {
    pub run_id: RunId,
    pub status: RunStatus,
    /// Final text when completed, recorded failure otherwise
    pub outcome: Result<String, RunFailure>,
    pub iterations: usize,
    pub llm_calls: usize,
    pub tool_invocations: usize,
    pub conversation: Conversation,
}

impl RunAgentOutput {
    pub fn is_success(&self) -> bool {
        self.outcome.is_ok()
    }

    pub fn into_result(self) -> Result<String, RunFailure> {
        self.outcome
    }
}

impl From<AgentRun> for RunAgentOutput {
    fn from(run: AgentRun) -> Self {
        let outcome = match run.result() {
            Some(text) => Ok(text.to_string()),
            None => Err(run.failure().cloned().unwrap_or(RunFailure::Cancelled)),
        };
        Self {
            run_id: run.id().clone(),
            status: run.status(),
            outcome,
            iterations: run.iteration_count(),
            llm_calls: run.llm_calls(),
            tool_invocations: run.tool_invocations(),
            conversation: run.conversation().clone(),
        }
    }
}
