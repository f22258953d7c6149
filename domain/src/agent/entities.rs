//! Agent run entity and its state machine.
//!
//! ```text
//! AwaitingLlm ──final text──▶ Completed
//!     │  ▲
//!     │  └── tool results recorded
//!     ▼  │
//! ExecutingTools
//!
//! any non-terminal phase ──backend error / cap / cancel──▶ Failed
//! ```

use super::value_objects::{RunFailure, RunId};
use crate::core::error::DomainError;
use crate::session::entities::{Conversation, Message};
use crate::tool::entities::ToolCallRequest;
use crate::tool::value_objects::ToolCallResult;
use serde::{Deserialize, Serialize};

/// Phase of a run's control loop
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgentPhase {
    /// Next step is an LLM consultation
    AwaitingLlm,
    /// A tool-call batch is pending results
    ExecutingTools,
    Completed,
    Failed,
}

impl AgentPhase {
    pub fn as_str(&self) -> &str {
        match self {
            AgentPhase::AwaitingLlm => "awaiting_llm",
            AgentPhase::ExecutingTools => "executing_tools",
            AgentPhase::Completed => "completed",
            AgentPhase::Failed => "failed",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, AgentPhase::Completed | AgentPhase::Failed)
    }
}

impl std::fmt::Display for AgentPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Externally visible status of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunStatus {
    Running,
    Completed,
    Failed,
}

/// One end-to-end execution of the agent loop for a single request.
///
/// Owns its conversation exclusively. Fields are private so that the only way
/// to advance a run is through the transition methods, which keep the
/// conversation and counters consistent.
#[derive(Debug, Clone)]
pub struct AgentRun {
    id: RunId,
    conversation: Conversation,
    max_iterations: usize,
    iteration_count: usize,
    llm_calls: usize,
    tool_invocations: usize,
    phase: AgentPhase,
    pending_calls: Vec<ToolCallRequest>,
    result: Option<String>,
    failure: Option<RunFailure>,
}

impl AgentRun {
    pub fn new(id: RunId, conversation: Conversation, max_iterations: usize) -> Self {
        Self {
            id,
            conversation,
            max_iterations,
            iteration_count: 0,
            llm_calls: 0,
            tool_invocations: 0,
            phase: AgentPhase::AwaitingLlm,
            pending_calls: Vec::new(),
            result: None,
            failure: None,
        }
    }

    fn expect_phase(&self, expected: AgentPhase, action: &str) -> Result<(), DomainError> {
        if self.phase != expected {
            return Err(DomainError::InvalidTransition(format!(
                "cannot {} while {}",
                action, self.phase
            )));
        }
        Ok(())
    }

    /// Record that an LLM consultation is starting.
    pub fn begin_llm_call(&mut self) -> Result<(), DomainError> {
        self.expect_phase(AgentPhase::AwaitingLlm, "consult the model")?;
        self.llm_calls += 1;
        Ok(())
    }

    /// The model produced a final answer.
    pub fn complete(&mut self, text: impl Into<String>) -> Result<(), DomainError> {
        self.expect_phase(AgentPhase::AwaitingLlm, "complete")?;
        let text = text.into();
        self.conversation.push(Message::assistant(text.clone()));
        self.result = Some(text);
        self.phase = AgentPhase::Completed;
        Ok(())
    }

    /// The model requested a batch of tool calls.
    ///
    /// When the run has already used all of its tool rounds it is failed with
    /// [`RunFailure::IterationLimitExceeded`] instead, and the calls are neither
    /// appended nor returned. Otherwise the assistant tool-call message is
    /// appended and the batch becomes pending.
    ///
    /// An id already used by an earlier turn of this run is replaced with a
    /// synthesized one, so every result pairs with exactly one call.
    pub fn request_tools(&mut self, mut calls: Vec<ToolCallRequest>) -> Result<(), DomainError> {
        self.expect_phase(AgentPhase::AwaitingLlm, "request tools")?;
        if calls.is_empty() {
            return Err(DomainError::InvalidTransition(
                "tool-call batch must not be empty".to_string(),
            ));
        }

        if self.iteration_count >= self.max_iterations {
            self.fail(RunFailure::IterationLimitExceeded {
                max_iterations: self.max_iterations,
            });
            return Ok(());
        }

        for (index, call) in calls.iter_mut().enumerate() {
            if self.conversation.has_call_id(&call.id) {
                call.id = self.unused_call_id(index);
            }
        }

        self.conversation
            .push(Message::assistant_tool_calls(calls.clone()));
        self.pending_calls = calls;
        self.phase = AgentPhase::ExecutingTools;
        Ok(())
    }

    fn unused_call_id(&self, index: usize) -> String {
        let base = self.conversation.next_call_id(index);
        let mut id = base.clone();
        let mut attempt = 1;
        while self.conversation.has_call_id(&id) {
            id = format!("{}_{}", base, attempt);
            attempt += 1;
        }
        id
    }

    /// Calls awaiting results, in model order.
    pub fn pending_calls(&self) -> &[ToolCallRequest] {
        &self.pending_calls
    }

    /// Append one tool message per result and close the tool round.
    ///
    /// Results must answer the pending calls one-to-one and in order.
    pub fn record_tool_results(&mut self, results: Vec<ToolCallResult>) -> Result<(), DomainError> {
        self.expect_phase(AgentPhase::ExecutingTools, "record tool results")?;
        if results.len() != self.pending_calls.len() {
            return Err(DomainError::InvalidTransition(format!(
                "expected {} tool results, got {}",
                self.pending_calls.len(),
                results.len()
            )));
        }
        if let Some((call, result)) = self
            .pending_calls
            .iter()
            .zip(&results)
            .find(|(call, result)| call.id != result.call_id)
        {
            return Err(DomainError::InvalidTransition(format!(
                "tool result '{}' does not answer call '{}'",
                result.call_id, call.id
            )));
        }

        for result in &results {
            self.conversation.push(Message::tool_result(result));
        }
        self.tool_invocations += results.len();
        self.iteration_count += 1;
        self.pending_calls.clear();
        self.phase = AgentPhase::AwaitingLlm;
        Ok(())
    }

    /// Terminate the run. A run that already finished keeps its outcome.
    pub fn fail(&mut self, failure: RunFailure) {
        if self.phase.is_terminal() {
            return;
        }
        self.pending_calls.clear();
        self.failure = Some(failure);
        self.phase = AgentPhase::Failed;
    }

    pub fn id(&self) -> &RunId {
        &self.id
    }

    pub fn conversation(&self) -> &Conversation {
        &self.conversation
    }

    pub fn phase(&self) -> AgentPhase {
        self.phase
    }

    pub fn status(&self) -> RunStatus {
        match self.phase {
            AgentPhase::Completed => RunStatus::Completed,
            AgentPhase::Failed => RunStatus::Failed,
            _ => RunStatus::Running,
        }
    }

    pub fn iteration_count(&self) -> usize {
        self.iteration_count
    }

    pub fn llm_calls(&self) -> usize {
        self.llm_calls
    }

    pub fn tool_invocations(&self) -> usize {
        self.tool_invocations
    }

    /// Final text; only set when completed.
    pub fn result(&self) -> Option<&str> {
        self.result.as_deref()
    }

    pub fn failure(&self) -> Option<&RunFailure> {
        self.failure.as_ref()
    }
}
