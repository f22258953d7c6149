//! Agent run value objects: identifiers and terminal failure reasons.

use crate::core::error::ErrorKind;
use serde::{Deserialize, Serialize};

/// Unique identifier for an agent run.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RunId(String);

impl RunId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for RunId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Why a backend consultation failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BackendFailure {
    /// No response within the configured timeout
    Timeout,
    /// Network or connection failure
    Unreachable,
    /// Non-success HTTP status
    Rejected { status: u16 },
    /// Response could not be interpreted as an [`Outcome`](crate::session::response::Outcome)
    Malformed,
}

impl BackendFailure {
    /// Caller-facing description without transport detail.
    pub fn public_message(&self) -> String {
        match self {
            BackendFailure::Timeout => "the language model did not respond in time".to_string(),
            BackendFailure::Unreachable => "the language model backend is unreachable".to_string(),
            BackendFailure::Rejected { status } => {
                format!("the language model backend rejected the request (HTTP {})", status)
            }
            BackendFailure::Malformed => {
                "the language model returned a response that could not be interpreted".to_string()
            }
        }
    }
}

/// Terminal failure recorded on a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RunFailure {
    /// The backend call failed; `detail` is for logs only.
    LlmBackend {
        failure: BackendFailure,
        detail: String,
    },
    /// The model kept requesting tools past the iteration cap.
    IterationLimitExceeded { max_iterations: usize },
    /// Client disconnect or shutdown aborted the run.
    Cancelled,
}

impl RunFailure {
    pub fn kind(&self) -> ErrorKind {
        match self {
            RunFailure::LlmBackend { .. } => ErrorKind::LlmBackend,
            RunFailure::IterationLimitExceeded { .. } => ErrorKind::IterationLimitExceeded,
            RunFailure::Cancelled => ErrorKind::Cancelled,
        }
    }

    /// Message safe to return to API callers.
    pub fn public_message(&self) -> String {
        match self {
            RunFailure::LlmBackend { failure, .. } => failure.public_message(),
            RunFailure::IterationLimitExceeded { max_iterations } => format!(
                "the agent did not reach an answer within {} tool iterations",
                max_iterations
            ),
            RunFailure::Cancelled => "the run was cancelled".to_string(),
        }
    }
}

impl std::fmt::Display for RunFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RunFailure::LlmBackend { detail, .. } => write!(f, "LLM backend error: {}", detail),
            RunFailure::IterationLimitExceeded { max_iterations } => {
                write!(f, "iteration limit of {} exceeded", max_iterations)
            }
            RunFailure::Cancelled => write!(f, "run cancelled"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failure_kinds() {
        let backend = RunFailure::LlmBackend {
            failure: BackendFailure::Timeout,
            detail: "request to http://ollama:11434 timed out".to_string(),
        };
        assert_eq!(backend.kind(), ErrorKind::LlmBackend);
        assert_eq!(
            RunFailure::IterationLimitExceeded { max_iterations: 3 }.kind(),
            ErrorKind::IterationLimitExceeded
        );
        assert_eq!(RunFailure::Cancelled.kind(), ErrorKind::Cancelled);
    }

    #[test]
    fn test_public_message_hides_detail() {
        let failure = RunFailure::LlmBackend {
            failure: BackendFailure::Unreachable,
            detail: "error sending request for url (http://10.0.0.5:11434/api/chat)".to_string(),
        };
        assert!(!failure.public_message().contains("10.0.0.5"));
        assert!(failure.to_string().contains("10.0.0.5"));
    }

    #[test]
    fn test_rejected_message_includes_status() {
        let msg = BackendFailure::Rejected { status: 429 }.public_message();
        assert!(msg.contains("429"));
    }
}
