//! Execution parameters: use case loop control.
//!
//! [`ExecutionParams`] groups the static parameters that control the
//! loop in [`RunAgentUseCase`](crate::use_cases::run_agent::RunAgentUseCase).
//! They are built once from configuration and shared read-only by every run.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Execution loop control parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutionParams {
    /// Maximum number of tool-call rounds per run.
    pub max_iterations: usize,
    /// Maximum tool calls from one model turn executing at once.
    pub tool_concurrency: usize,
    /// Bound on each LLM consultation.
    pub llm_timeout: Duration,
    /// Bound on each tool invocation.
    pub tool_timeout: Duration,
    /// Operator text appended to every user prompt.
    pub prompt_suffix: Option<String>,
}

impl Default for ExecutionParams {
    fn default() -> Self {
        Self {
            max_iterations: 10,
            tool_concurrency: 4,
            llm_timeout: Duration::from_secs(120),
            tool_timeout: Duration::from_secs(60),
            prompt_suffix: None,
        }
    }
}

impl ExecutionParams {
    // ==================== Builder Methods ====================

    pub fn with_max_iterations(mut self, max: usize) -> Self {
        self.max_iterations = max;
        self
    }

    /// Values below 1 are clamped to 1.
    pub fn with_tool_concurrency(mut self, limit: usize) -> Self {
        self.tool_concurrency = limit.max(1);
        self
    }

    pub fn with_llm_timeout(mut self, timeout: Duration) -> Self {
        self.llm_timeout = timeout;
        self
    }

    pub fn with_tool_timeout(mut self, timeout: Duration) -> Self {
        self.tool_timeout = timeout;
        self
    }

    pub fn with_prompt_suffix(mut self, suffix: Option<String>) -> Self {
        self.prompt_suffix = suffix.filter(|s| !s.trim().is_empty());
        self
    }

    /// Prompt as sent to the model, with the suffix (if any) appended.
    pub fn decorate_prompt(&self, prompt: &str) -> String {
        match &self.prompt_suffix {
            Some(suffix) => format!("{}\n\n{}", prompt, suffix),
            None => prompt.to_string(),
        }
    }
}
