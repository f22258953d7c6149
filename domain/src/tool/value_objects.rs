//! Tool domain value objects: immutable result and error types
//!
//! Every tool invocation produces a [`ToolCallResult`] carrying exactly one
//! of an output or a [`ToolError`]. Tool errors are never fatal to a run:
//! they are appended to the conversation so the model can react.

use serde::{Deserialize, Serialize};

/// Error that occurred during tool invocation.
///
/// | Code | Description |
/// |------|-------------|
/// | `NOT_FOUND` | Tool is not in the catalog |
/// | `INVALID_ARGUMENT` | Missing/wrong parameters, model can fix |
/// | `TIMEOUT` | The tool server did not answer in time |
/// | `EXECUTION_FAILED` | Transport or protocol failure talking to the tool server |
/// | `TOOL_ERROR` | The tool itself reported a failure |
/// | `CANCELLED` | The run was cancelled while the call was in flight |
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolError {
    /// Error code (e.g., "NOT_FOUND", "TIMEOUT")
    pub code: String,
    /// Human-readable error message
    pub message: String,
    /// Additional details
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ToolError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
        }
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    pub fn not_found(tool_name: impl Into<String>) -> Self {
        Self::new("NOT_FOUND", format!("Unknown tool: {}", tool_name.into()))
    }

    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::new("INVALID_ARGUMENT", message)
    }

    pub fn execution_failed(message: impl Into<String>) -> Self {
        Self::new("EXECUTION_FAILED", message)
    }

    pub fn tool_reported(message: impl Into<String>) -> Self {
        Self::new("TOOL_ERROR", message)
    }

    pub fn timeout(operation: impl Into<String>) -> Self {
        Self::new(
            "TIMEOUT",
            format!("Operation timed out: {}", operation.into()),
        )
    }

    pub fn cancelled(tool_name: impl Into<String>) -> Self {
        Self::new(
            "CANCELLED",
            format!("Call to {} was cancelled", tool_name.into()),
        )
    }

    pub fn is_timeout(&self) -> bool {
        self.code == "TIMEOUT"
    }
}

impl std::fmt::Display for ToolError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)?;
        if let Some(details) = &self.details {
            write!(f, " ({})", details)?;
        }
        Ok(())
    }
}

impl std::error::Error for ToolError {}

/// Output or failure of a single tool invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToolOutcome {
    Output(String),
    Error(ToolError),
}

/// Result of a tool invocation, linked to its request by `call_id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolCallResult {
    /// Matches the originating `ToolCallRequest::id`
    pub call_id: String,
    /// Name of the tool that was invoked
    pub tool_name: String,
    pub outcome: ToolOutcome,
    /// Wall-clock duration of the remote call
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_ms: Option<u64>,
}

impl ToolCallResult {
    /// Create a successful result
    pub fn success(
        call_id: impl Into<String>,
        tool_name: impl Into<String>,
        output: impl Into<String>,
    ) -> Self {
        Self {
            call_id: call_id.into(),
            tool_name: tool_name.into(),
            outcome: ToolOutcome::Output(output.into()),
            duration_ms: None,
        }
    }

    /// Create a failed result
    pub fn failure(call_id: impl Into<String>, tool_name: impl Into<String>, error: ToolError) -> Self {
        Self {
            call_id: call_id.into(),
            tool_name: tool_name.into(),
            outcome: ToolOutcome::Error(error),
            duration_ms: None,
        }
    }

    pub fn with_duration(mut self, duration_ms: u64) -> Self {
        self.duration_ms = Some(duration_ms);
        self
    }

    pub fn is_success(&self) -> bool {
        matches!(self.outcome, ToolOutcome::Output(_))
    }

    pub fn output(&self) -> Option<&str> {
        match &self.outcome {
            ToolOutcome::Output(text) => Some(text),
            ToolOutcome::Error(_) => None,
        }
    }

    pub fn error(&self) -> Option<&ToolError> {
        match &self.outcome {
            ToolOutcome::Output(_) => None,
            ToolOutcome::Error(err) => Some(err),
        }
    }

    /// Text appended to the conversation as the tool message content.
    pub fn content_for_model(&self) -> String {
        match &self.outcome {
            ToolOutcome::Output(text) => text.clone(),
            ToolOutcome::Error(err) => format!("Error: {}", err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tool_error_display() {
        let err = ToolError::timeout("get_markdown_content").with_details("after 30s");

        assert_eq!(err.code, "TIMEOUT");
        assert!(err.is_timeout());
        assert_eq!(
            err.to_string(),
            "[TIMEOUT] Operation timed out: get_markdown_content (after 30s)"
        );
    }

    #[test]
    fn test_result_success() {
        let result = ToolCallResult::success("call_1", "get_markdown_content", "# Title")
            .with_duration(12);

        assert!(result.is_success());
        assert_eq!(result.output(), Some("# Title"));
        assert!(result.error().is_none());
        assert_eq!(result.content_for_model(), "# Title");
        assert_eq!(result.duration_ms, Some(12));
    }

    #[test]
    fn test_result_failure() {
        let result = ToolCallResult::failure("call_2", "nope", ToolError::not_found("nope"));

        assert!(!result.is_success());
        assert!(result.output().is_none());
        assert_eq!(result.error().unwrap().code, "NOT_FOUND");
        assert_eq!(result.content_for_model(), "Error: [NOT_FOUND] Unknown tool: nope");
    }

    #[test]
    fn test_outcome_serialization_is_tagged() {
        let result = ToolCallResult::failure("c", "t", ToolError::tool_reported("boom"));
        let json = serde_json::to_value(&result).unwrap();

        assert_eq!(json["outcome"]["error"]["code"], "TOOL_ERROR");
        assert!(json["outcome"].get("output").is_none());
    }
}
