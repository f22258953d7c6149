//! Tool server configuration from TOML (`[tools]` section)

use super::validate_timeout;
use mcp_agent_application::DiscoveryPolicy;
use mcp_agent_domain::{ConfigIssue, ConfigIssueCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Raw MCP tool server configuration
///
/// # Example
///
/// ```toml
/// [tools]
/// server_url = "http://alfresco-mcp:8003/mcp"
/// timeout_secs = 60.0
/// discovery_attempts = 3
/// discovery_backoff_ms = 500
/// allow_empty = false
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileToolsConfig {
    /// Streamable-HTTP endpoint of the MCP server
    pub server_url: Option<String>,
    /// Bound on each tool call
    pub timeout_secs: f64,
    pub discovery_attempts: usize,
    pub discovery_backoff_ms: u64,
    /// Start even if the server publishes no tools
    pub allow_empty: bool,
}

impl Default for FileToolsConfig {
    fn default() -> Self {
        Self {
            server_url: None,
            timeout_secs: 60.0,
            discovery_attempts: 3,
            discovery_backoff_ms: 500,
            allow_empty: false,
        }
    }
}

impl FileToolsConfig {
    pub fn validate(&self) -> Vec<ConfigIssue> {
        let mut issues = Vec::new();

        match self.server_url.as_deref().map(str::trim) {
            None | Some("") => issues.push(ConfigIssue::error(
                ConfigIssueCode::MissingValue,
                "tools.server_url",
                "the MCP tool server URL is required (or set MCP_SERVER_URL)",
            )),
            Some(url) if !url.starts_with("http://") && !url.starts_with("https://") => {
                issues.push(ConfigIssue::error(
                    ConfigIssueCode::InvalidEnumValue,
                    "tools.server_url",
                    format!("'{}' is not an http(s) URL", url),
                ))
            }
            Some(_) => {}
        }

        issues.extend(validate_timeout("tools.timeout_secs", self.timeout_secs));

        if self.discovery_attempts == 0 {
            issues.push(ConfigIssue::error(
                ConfigIssueCode::OutOfRange,
                "tools.discovery_attempts",
                "must be at least 1",
            ));
        }
        issues
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs_f64(self.timeout_secs.max(0.0))
    }

    pub fn discovery_policy(&self) -> DiscoveryPolicy {
        DiscoveryPolicy {
            attempts: self.discovery_attempts.max(1),
            backoff: Duration::from_millis(self.discovery_backoff_ms),
            allow_empty: self.allow_empty,
        }
    }
}
