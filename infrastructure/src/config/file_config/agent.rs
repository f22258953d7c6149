//! Agent configuration from TOML (`[agent]` section)

use mcp_agent_application::ExecutionParams;
use mcp_agent_domain::{ConfigIssue, ConfigIssueCode};
use serde::{Deserialize, Serialize};

/// Raw agent loop configuration
///
/// # Example
///
/// ```toml
/// [agent]
/// max_iterations = 10        # tool-call rounds per run
/// tool_concurrency = 4       # parallel tool calls per round
/// prompt_suffix = "Respond with tool calls in JSON when you need data."
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileAgentConfig {
    pub max_iterations: usize,
    pub tool_concurrency: usize,
    pub prompt_suffix: Option<String>,
}

impl Default for FileAgentConfig {
    fn default() -> Self {
        Self {
            max_iterations: 10,
            tool_concurrency: 4,
            prompt_suffix: None,
        }
    }
}

impl FileAgentConfig {
    pub fn validate(&self) -> Vec<ConfigIssue> {
        let mut issues = Vec::new();
        if self.tool_concurrency == 0 {
            issues.push(ConfigIssue::error(
                ConfigIssueCode::OutOfRange,
                "agent.tool_concurrency",
                "must be at least 1",
            ));
        }
        if self.max_iterations == 0 {
            issues.push(ConfigIssue::warning(
                ConfigIssueCode::OutOfRange,
                "agent.max_iterations",
                "is 0: every run that requests a tool will fail",
            ));
        }
        issues
    }

    /// Loop parameters; timeouts are filled in by [`FileConfig`](super::FileConfig).
    pub fn to_execution_params(&self) -> ExecutionParams {
        ExecutionParams::default()
            .with_max_iterations(self.max_iterations)
            .with_tool_concurrency(self.tool_concurrency)
            .with_prompt_suffix(self.prompt_suffix.clone())
    }
}
