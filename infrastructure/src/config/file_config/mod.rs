//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! They are deserialized directly; [`FileConfig::validate`] reports every
//! problem at once as [`ConfigIssue`]s.

mod agent;
mod backend;
mod server;
mod tools;

pub use agent::FileAgentConfig;
pub use backend::{FileBackendConfig, FileOllamaConfig, FileOpenAiConfig};
pub use server::FileServerConfig;
pub use tools::FileToolsConfig;

use mcp_agent_application::ExecutionParams;
use mcp_agent_domain::{ConfigIssue, ConfigIssueCode};
use serde::{Deserialize, Serialize};

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// HTTP listener settings
    pub server: FileServerConfig,
    /// LLM backend selection and endpoints
    pub backend: FileBackendConfig,
    /// MCP tool server settings
    pub tools: FileToolsConfig,
    /// Agent loop settings
    pub agent: FileAgentConfig,
}

impl FileConfig {
    /// Validate the entire configuration, returning all detected issues.
    pub fn validate(&self) -> Vec<ConfigIssue> {
        let mut issues = Vec::new();
        issues.extend(self.backend.validate());
        issues.extend(self.tools.validate());
        issues.extend(self.agent.validate());
        issues
    }

    /// Loop parameters for the agent use case.
    pub fn execution_params(&self) -> ExecutionParams {
        self.agent
            .to_execution_params()
            .with_llm_timeout(self.backend.timeout())
            .with_tool_timeout(self.tools.timeout())
    }

    /// Copy with secrets masked, for `--show-config` and startup logs.
    pub fn masked(&self) -> Self {
        let mut copy = self.clone();
        copy.backend.openai.api_key = copy.backend.openai.api_key.as_deref().map(mask_secret);
        copy
    }

    /// TOML rendering of [`masked`](Self::masked).
    pub fn to_masked_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(&self.masked())
    }
}

/// Keep only the last 4 characters of a secret.
pub fn mask_secret(secret: &str) -> String {
    let chars: Vec<char> = secret.chars().collect();
    if chars.len() <= 4 {
        return "****".to_string();
    }
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("****{}", tail)
}

pub(crate) fn validate_timeout(key: &str, secs: f64) -> Option<ConfigIssue> {
    if secs.is_finite() && secs > 0.0 {
        return None;
    }
    Some(ConfigIssue::error(
        ConfigIssueCode::OutOfRange,
        key,
        format!("must be a positive number of seconds, got {}", secs),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_deserialize_full_config() {
        let toml_str = r#"
[server]
bind_address = "127.0.0.1"
port = 9000
cors_allow_any_origin = false

[backend]
kind = "litellm"
timeout_secs = 30.5

[backend.openai]
model = "gpt-4o-mini"
api_base = "http://litellm:4000"
api_key = "sk-test-1234567890"

[tools]
server_url = "http://alfresco-mcp:8003/mcp"
timeout_secs = 15

[agent]
max_iterations = 5
tool_concurrency = 2
prompt_suffix = "Use tools when unsure."
"#;

        let config: FileConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.server.socket_address(), "127.0.0.1:9000");
        assert!(!config.server.cors_allow_any_origin);
        assert_eq!(config.backend.kind, "litellm");
        assert_eq!(config.backend.openai.model.as_deref(), Some("gpt-4o-mini"));
        assert_eq!(config.tools.timeout_secs, 15.0);
        assert!(config.validate().is_empty());

        let params = config.execution_params();
        assert_eq!(params.max_iterations, 5);
        assert_eq!(params.tool_concurrency, 2);
        assert_eq!(params.llm_timeout, Duration::from_secs_f64(30.5));
        assert_eq!(params.tool_timeout, Duration::from_secs(15));
        assert_eq!(params.prompt_suffix.as_deref(), Some("Use tools when unsure."));
    }

    #[test]
    fn test_deserialize_partial_config() {
        let toml_str = r#"
[backend.ollama]
model = "llama3.1:8b"

[tools]
server_url = "http://localhost:8003/mcp"
"#;

        let config: FileConfig = toml::from_str(toml_str).unwrap();
        // Defaults should apply
        assert_eq!(config.backend.kind, "ollama");
        assert_eq!(config.backend.ollama.base_url, "http://localhost:11434");
        assert_eq!(config.server.port, 8000);
        assert_eq!(config.agent.max_iterations, 10);
        assert!(config.validate().is_empty());
    }

    #[test]
    fn test_default_config_reports_missing_values() {
        let issues = FileConfig::default().validate();
        let keys: Vec<_> = issues.iter().map(|i| i.key.as_str()).collect();
        assert!(keys.contains(&"backend.ollama.model"));
        assert!(keys.contains(&"tools.server_url"));
        assert!(ConfigIssue::has_errors(&issues));
    }

    #[test]
    fn test_masked_hides_api_key() {
        let mut config = FileConfig::default();
        config.backend.openai.api_key = Some("sk-live-abcdefgh1234".to_string());

        let rendered = config.to_masked_toml().unwrap();
        assert!(rendered.contains("****1234"));
        assert!(!rendered.contains("abcdefgh"));
        // The original is untouched
        assert_eq!(
            config.backend.openai.api_key.as_deref(),
            Some("sk-live-abcdefgh1234")
        );
    }

    #[test]
    fn test_mask_secret_short() {
        assert_eq!(mask_secret("abc"), "****");
        assert_eq!(mask_secret("abcde"), "****bcde");
    }
}
