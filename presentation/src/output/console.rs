//! Console output formatter for `ask` and `tools`

use colored::Colorize;
use mcp_agent_application::RunAgentOutput;
use mcp_agent_domain::{RunFailure, ToolCatalog};

/// Formats run results and tool catalogs for the terminal
pub struct ConsoleFormatter;

impl ConsoleFormatter {
    /// The discovered tools, one block per tool
    pub fn format_tools(catalog: &ToolCatalog, endpoint: &str) -> String {
        let mut output = String::new();
        output.push_str(&Self::header(&format!("Tools at {}", endpoint)));
        output.push('\n');

        if catalog.is_empty() {
            output.push_str(&format!("\n{}\n", "(no tools published)".dimmed()));
        }

        for tool in catalog.all() {
            output.push_str(&format!("\n{}\n", tool.name.yellow().bold()));
            if !tool.description.is_empty() {
                output.push_str(&Self::indent(&tool.description, "  "));
                output.push('\n');
            }
            for param in &tool.parameter_schema.parameters {
                let marker = if param.required {
                    "required".red().to_string()
                } else {
                    "optional".dimmed().to_string()
                };
                output.push_str(&format!(
                    "  - {} ({}, {})",
                    param.name.cyan(),
                    param.param_type,
                    marker
                ));
                if !param.description.is_empty() {
                    output.push_str(&format!(": {}", param.description));
                }
                output.push('\n');
            }
        }

        output.push_str(&Self::footer());
        output
    }

    /// Final answer of a completed run
    pub fn format_answer(output: &RunAgentOutput, answer: &str) -> String {
        format!(
            "{}\n\n{}\n",
            answer,
            format!(
                "[run {} | {} LLM call(s), {} tool call(s)]",
                output.run_id, output.llm_calls, output.tool_invocations
            )
            .dimmed()
        )
    }

    /// Failure line of a failed run
    pub fn format_failure(failure: &RunFailure) -> String {
        format!(
            "{} {}: {}",
            "Error".red().bold(),
            failure.kind(),
            failure.public_message()
        )
    }

    fn header(title: &str) -> String {
        let line = "=".repeat(60);
        format!("{}\n{}\n{}", line.cyan(), title.bold(), line.cyan())
    }

    fn footer() -> String {
        format!("\n{}\n", "=".repeat(60).cyan())
    }

    /// Indent a multi-line string
    pub fn indent(text: &str, prefix: &str) -> String {
        text.lines()
            .map(|line| format!("{}{}", prefix, line))
            .collect::<Vec<_>>()
            .join("\n")
    }
}
