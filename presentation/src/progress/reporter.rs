//! Progress reporting for `mcp-agent ask`

use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use mcp_agent_application::RunProgressNotifier;
use mcp_agent_domain::util::preview;
use mcp_agent_domain::{RunId, ToolCallRequest, ToolCallResult};
use std::time::Duration;

/// Spinner on stderr that follows the agent loop
pub struct ProgressReporter {
    spinner: ProgressBar,
}

impl ProgressReporter {
    pub fn new() -> Self {
        let spinner = ProgressBar::new_spinner();
        spinner.set_style(Self::spinner_style());
        spinner.enable_steady_tick(Duration::from_millis(100));
        Self { spinner }
    }

    fn spinner_style() -> ProgressStyle {
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {prefix:.bold} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
    }

    /// Stop the spinner without leaving a line behind.
    pub fn finish(&self) {
        self.spinner.finish_and_clear();
    }
}

impl Default for ProgressReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for ProgressReporter {
    fn drop(&mut self) {
        self.spinner.finish_and_clear();
    }
}

impl RunProgressNotifier for ProgressReporter {
    fn on_llm_call(&self, _run_id: &RunId, call_number: usize) {
        self.spinner.set_prefix(format!("LLM #{}", call_number));
        self.spinner.set_message("thinking...");
    }

    fn on_tool_call(&self, _run_id: &RunId, call: &ToolCallRequest) {
        self.spinner.set_prefix("Tool");
        self.spinner.set_message(format!(
            "{} {}",
            call.tool_name.cyan(),
            preview(&call.arguments_value().to_string(), 60).dimmed()
        ));
    }

    fn on_tool_result(&self, _run_id: &RunId, result: &ToolCallResult) {
        let line = match result.error() {
            None => format!(
                "  {} {} ({} ms)",
                "v".green(),
                result.tool_name,
                result.duration_ms.unwrap_or_default()
            ),
            Some(error) => format!(
                "  {} {} [{}] {}",
                "x".red(),
                result.tool_name,
                error.code,
                error.message
            ),
        };
        self.spinner.println(line);
    }

    fn on_complete(&self, _run_id: &RunId, _answer: &str) {
        self.spinner.finish_and_clear();
    }
}
