//! LLM backend configuration from TOML (`[backend]` section)

use super::validate_timeout;
use crate::backends::BackendKind;
use mcp_agent_domain::{ConfigIssue, ConfigIssueCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Raw LLM backend configuration
///
/// # Example
///
/// ```toml
/// [backend]
/// kind = "ollama"          # "ollama", "litellm" or "openai"
/// timeout_secs = 120.0
/// temperature = 0.1
/// top_p = 0.9
///
/// [backend.ollama]
/// model = "llama3.1:8b"
/// base_url = "http://ollama:11434"
///
/// [backend.openai]
/// model = "gpt-4o-mini"
/// api_base = "http://litellm:4000"
/// api_key_env = "LITELLM_API_KEY"
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileBackendConfig {
    pub kind: String,
    /// Bound on each completion call
    pub timeout_secs: f64,
    pub temperature: f32,
    pub top_p: f32,
    pub ollama: FileOllamaConfig,
    pub openai: FileOpenAiConfig,
}

impl Default for FileBackendConfig {
    fn default() -> Self {
        Self {
            kind: "ollama".to_string(),
            timeout_secs: 120.0,
            temperature: 0.1,
            top_p: 0.9,
            ollama: FileOllamaConfig::default(),
            openai: FileOpenAiConfig::default(),
        }
    }
}

/// Self-hosted Ollama endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileOllamaConfig {
    pub model: Option<String>,
    pub base_url: String,
}

impl Default for FileOllamaConfig {
    fn default() -> Self {
        Self {
            model: None,
            base_url: "http://localhost:11434".to_string(),
        }
    }
}

/// OpenAI-compatible endpoint (LiteLLM proxy or hosted API)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileOpenAiConfig {
    pub model: Option<String>,
    /// Base URL; `/v1/chat/completions` is appended
    pub api_base: String,
    /// Direct API key (prefer `api_key_env`).
    pub api_key: Option<String>,
    /// Environment variable holding the API key.
    pub api_key_env: String,
}

impl Default for FileOpenAiConfig {
    fn default() -> Self {
        Self {
            model: None,
            api_base: "http://localhost:4000".to_string(),
            api_key: None,
            api_key_env: "LITELLM_API_KEY".to_string(),
        }
    }
}

impl FileOpenAiConfig {
    /// Explicit key first, then the configured environment variable.
    pub fn resolve_api_key(&self) -> Option<String> {
        self.api_key
            .clone()
            .or_else(|| std::env::var(&self.api_key_env).ok())
            .filter(|k| !k.trim().is_empty())
    }
}

impl FileBackendConfig {
    /// Parse `kind`, reporting an error for unknown values.
    pub fn parse_kind(&self) -> (Option<BackendKind>, Vec<ConfigIssue>) {
        match self.kind.parse::<BackendKind>() {
            Ok(kind) => (Some(kind), vec![]),
            Err(_) => (
                None,
                vec![ConfigIssue::error(
                    ConfigIssueCode::InvalidEnumValue,
                    "backend.kind",
                    format!(
                        "unknown value '{}', expected one of: ollama, litellm, openai",
                        self.kind
                    ),
                )],
            ),
        }
    }

    pub fn validate(&self) -> Vec<ConfigIssue> {
        let (kind, mut issues) = self.parse_kind();

        match kind {
            Some(BackendKind::Ollama) => {
                if is_blank(&self.ollama.model) {
                    issues.push(ConfigIssue::error(
                        ConfigIssueCode::MissingValue,
                        "backend.ollama.model",
                        "an Ollama model is required (or set OLLAMA_MODEL)",
                    ));
                }
                if self.ollama.base_url.trim().is_empty() {
                    issues.push(ConfigIssue::error(
                        ConfigIssueCode::MissingValue,
                        "backend.ollama.base_url",
                        "the Ollama base URL is required (or set OLLAMA_BASE_URL)",
                    ));
                }
            }
            Some(BackendKind::OpenAi) => {
                if is_blank(&self.openai.model) {
                    issues.push(ConfigIssue::error(
                        ConfigIssueCode::MissingValue,
                        "backend.openai.model",
                        "a model is required (or set LITELLM_MODEL)",
                    ));
                }
                if self.openai.api_base.trim().is_empty() {
                    issues.push(ConfigIssue::error(
                        ConfigIssueCode::MissingValue,
                        "backend.openai.api_base",
                        "the API base URL is required (or set LITELLM_API_BASE)",
                    ));
                }
                if self.openai.resolve_api_key().is_none() {
                    issues.push(ConfigIssue::warning(
                        ConfigIssueCode::MissingValue,
                        "backend.openai.api_key",
                        format!(
                            "no API key configured and ${} is unset; requests are sent unauthenticated",
                            self.openai.api_key_env
                        ),
                    ));
                }
            }
            None => {}
        }

        issues.extend(validate_timeout("backend.timeout_secs", self.timeout_secs));

        if !(0.0..=2.0).contains(&self.temperature) {
            issues.push(ConfigIssue::error(
                ConfigIssueCode::OutOfRange,
                "backend.temperature",
                format!("{} is outside 0.0..=2.0", self.temperature),
            ));
        }
        if !(self.top_p > 0.0 && self.top_p <= 1.0) {
            issues.push(ConfigIssue::error(
                ConfigIssueCode::OutOfRange,
                "backend.top_p",
                format!("{} is outside (0.0, 1.0]", self.top_p),
            ));
        }

        issues
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs_f64(self.timeout_secs.max(0.0))
    }
}

fn is_blank(value: &Option<String>) -> bool {
    value.as_deref().map(str::trim).unwrap_or_default().is_empty()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ollama(model: &str) -> FileBackendConfig {
        FileBackendConfig {
            ollama: FileOllamaConfig {
                model: Some(model.to_string()),
                ..Default::default()
            },
            ..Default::default()
        }
    }

    #[test]
    fn test_ollama_requires_model() {
        let issues = FileBackendConfig::default().validate();
        assert!(
            issues
                .iter()
                .any(|i| i.key == "backend.ollama.model" && i.code == ConfigIssueCode::MissingValue)
        );

        assert!(ollama("llama3.1:8b").validate().is_empty());
        assert!(ConfigIssue::has_errors(&ollama("  ").validate()));
    }

    #[test]
    fn test_unknown_kind() {
        let config = FileBackendConfig {
            kind: "bedrock".to_string(),
            ..ollama("llama3.1")
        };
        let issues = config.validate();
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].code, ConfigIssueCode::InvalidEnumValue);
    }

    #[test]
    fn test_litellm_alias_and_missing_key_warning() {
        let config = FileBackendConfig {
            kind: "LiteLLM".to_string(),
            openai: FileOpenAiConfig {
                model: Some("gpt-4o-mini".to_string()),
                api_key_env: "MCP_AGENT_TEST_KEY_THAT_IS_NEVER_SET".to_string(),
                ..Default::default()
            },
            ..Default::default()
        };
        assert_eq!(config.parse_kind().0, Some(BackendKind::OpenAi));

        let issues = config.validate();
        assert_eq!(issues.len(), 1);
        assert!(!ConfigIssue::has_errors(&issues));
    }

    #[test]
    fn test_explicit_key_wins() {
        let config = FileOpenAiConfig {
            api_key: Some("sk-direct".to_string()),
            ..Default::default()
        };
        assert_eq!(config.resolve_api_key().as_deref(), Some("sk-direct"));
    }

    #[test]
    fn test_sampling_ranges() {
        let config = FileBackendConfig {
            temperature: 3.0,
            top_p: 0.0,
            ..ollama("llama3.1")
        };
        let keys: Vec<_> = config.validate().into_iter().map(|i| i.key).collect();
        assert_eq!(keys, vec!["backend.temperature", "backend.top_p"]);
    }

    #[test]
    fn test_non_positive_timeout() {
        let config = FileBackendConfig {
            timeout_secs: 0.0,
            ..ollama("llama3.1")
        };
        assert!(ConfigIssue::has_errors(&config.validate()));
    }
}
