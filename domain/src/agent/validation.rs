//! Structured configuration issues.
//!
//! Configuration is validated as a whole and every problem is reported at
//! once, each tagged with a [`Severity`]. Startup aborts if any issue is an
//! [`Severity::Error`]; warnings are logged.

/// Severity level of a configuration issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Fatal: the service cannot start with this configuration.
    Error,
    /// Non-fatal: the configuration works but may not behave as expected.
    Warning,
}

/// Identifies a specific configuration issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigIssueCode {
    /// A required value is absent or blank.
    MissingValue,
    /// A value is not one of the recognized choices.
    InvalidEnumValue,
    /// A numeric value is outside its accepted range.
    OutOfRange,
    /// A value is accepted but unusual (e.g. plain-http API base with a key).
    Suspicious,
}

/// A detected issue in the configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigIssue {
    pub severity: Severity,
    pub code: ConfigIssueCode,
    /// Dotted key path, e.g. `backend.ollama.model`
    pub key: String,
    pub message: String,
}

impl ConfigIssue {
    pub fn error(code: ConfigIssueCode, key: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            code,
            key: key.into(),
            message: message.into(),
        }
    }

    pub fn warning(
        code: ConfigIssueCode,
        key: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            severity: Severity::Warning,
            code,
            key: key.into(),
            message: message.into(),
        }
    }

    /// True if any issue in the list is fatal.
    pub fn has_errors(issues: &[ConfigIssue]) -> bool {
        issues.iter().any(|i| i.severity == Severity::Error)
    }
}

impl std::fmt::Display for ConfigIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.key, self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn has_errors_returns_true_for_errors() {
        let issues = vec![
            ConfigIssue::warning(ConfigIssueCode::Suspicious, "backend.openai.api_base", "http"),
            ConfigIssue::error(ConfigIssueCode::MissingValue, "tools.server_url", "required"),
        ];
        assert!(ConfigIssue::has_errors(&issues));
    }

    #[test]
    fn has_errors_returns_false_for_warnings_only() {
        let issues = vec![ConfigIssue::warning(
            ConfigIssueCode::Suspicious,
            "backend.openai.api_base",
            "plain http",
        )];
        assert!(!ConfigIssue::has_errors(&issues));
    }

    #[test]
    fn has_errors_returns_false_for_empty() {
        assert!(!ConfigIssue::has_errors(&[]));
    }

    #[test]
    fn display_includes_key() {
        let issue = ConfigIssue::error(
            ConfigIssueCode::OutOfRange,
            "agent.tool_concurrency",
            "must be at least 1",
        );
        assert_eq!(issue.to_string(), "agent.tool_concurrency: must be at least 1");
    }
}
