//! LLM backend adapters
//!
//! Two wire formats are supported: Ollama's native `/api/chat` and the
//! OpenAI chat completions API (LiteLLM proxy or a hosted endpoint).

mod ollama;
mod openai;

pub use ollama::OllamaBackend;
pub use openai::OpenAiBackend;

use crate::config::{ConfigError, FileBackendConfig};
use mcp_agent_application::{BackendError, LlmBackend};
use std::str::FromStr;
use std::sync::Arc;

/// Which wire format to speak
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendKind {
    Ollama,
    /// OpenAI-compatible API; `litellm` is accepted as an alias
    OpenAi,
}

impl BackendKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            BackendKind::Ollama => "ollama",
            BackendKind::OpenAi => "openai",
        }
    }
}

impl FromStr for BackendKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ollama" => Ok(BackendKind::Ollama),
            "openai" | "litellm" => Ok(BackendKind::OpenAi),
            other => Err(format!("unknown backend kind: {}", other)),
        }
    }
}

impl std::fmt::Display for BackendKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Sampling parameters forwarded with every request
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SamplingOptions {
    pub temperature: f32,
    pub top_p: f32,
}

impl Default for SamplingOptions {
    fn default() -> Self {
        Self {
            temperature: 0.1,
            top_p: 0.9,
        }
    }
}

/// Build the configured backend.
///
/// Expects a configuration that already passed validation; missing values
/// are still reported rather than defaulted.
pub fn build_backend(config: &FileBackendConfig) -> Result<Arc<dyn LlmBackend>, ConfigError> {
    let kind: BackendKind = config
        .kind
        .parse()
        .map_err(|_| ConfigError::Missing("backend.kind"))?;
    let sampling = SamplingOptions {
        temperature: config.temperature,
        top_p: config.top_p,
    };

    match kind {
        BackendKind::Ollama => {
            let model = non_blank(&config.ollama.model)
                .ok_or(ConfigError::Missing("backend.ollama.model"))?;
            Ok(Arc::new(
                OllamaBackend::new(&config.ollama.base_url, model, config.timeout())
                    .with_sampling(sampling),
            ))
        }
        BackendKind::OpenAi => {
            let model = non_blank(&config.openai.model)
                .ok_or(ConfigError::Missing("backend.openai.model"))?;
            Ok(Arc::new(
                OpenAiBackend::new(
                    &config.openai.api_base,
                    model,
                    config.openai.resolve_api_key(),
                    config.timeout(),
                )
                .with_sampling(sampling),
            ))
        }
    }
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

/// Map a reqwest send failure.
fn send_error(err: reqwest::Error, timeout: std::time::Duration) -> BackendError {
    if err.is_timeout() {
        BackendError::Timeout(timeout)
    } else {
        BackendError::Transport(err.to_string())
    }
}

/// Turn a non-success response into [`BackendError::Status`].
async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, BackendError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(BackendError::Status {
        status: status.as_u16(),
        body,
    })
}

/// Accept tool arguments either as a JSON object or as a string holding one.
fn parse_arguments(
    tool_name: &str,
    value: serde_json::Value,
) -> Result<serde_json::Map<String, serde_json::Value>, BackendError> {
    match value {
        serde_json::Value::Object(map) => Ok(map),
        serde_json::Value::Null => Ok(serde_json::Map::new()),
        serde_json::Value::String(raw) if raw.trim().is_empty() => Ok(serde_json::Map::new()),
        serde_json::Value::String(raw) => match serde_json::from_str(&raw) {
            Ok(serde_json::Value::Object(map)) => Ok(map),
            Ok(_) => Err(BackendError::Malformed(format!(
                "arguments for '{}' are not a JSON object",
                tool_name
            ))),
            Err(e) => Err(BackendError::Malformed(format!(
                "error parsing tool call arguments for '{}': {}",
                tool_name, e
            ))),
        },
        _ => Err(BackendError::Malformed(format!(
            "arguments for '{}' are not a JSON object",
            tool_name
        ))),
    }
}
