//! Configuration loader with multi-source merging

use super::file_config::FileConfig;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Project-level config file names, checked in order
const PROJECT_FILES: &[&str] = &["mcp-agent.toml", ".mcp-agent.toml"];

/// Prefix for structured environment overrides (`__` separates nesting)
const ENV_PREFIX: &str = "MCP_AGENT_";

/// Flat environment variables understood for compatibility with existing
/// deployments, and the key each one sets.
const LEGACY_ENV: &[(&str, &str)] = &[
    ("LLM_CHOICE", "backend.kind"),
    ("OLLAMA_MODEL", "backend.ollama.model"),
    ("OLLAMA_BASE_URL", "backend.ollama.base_url"),
    ("OLLAMA_TIMEOUT", "backend.timeout_secs"),
    ("LITELLM_MODEL", "backend.openai.model"),
    ("LITELLM_API_BASE", "backend.openai.api_base"),
    ("MCP_SERVER_URL", "tools.server_url"),
];

/// Errors that can occur while loading configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Config file not found: {0}")]
    NotFound(PathBuf),

    #[error("Invalid configuration: {0}")]
    Invalid(#[from] Box<figment::Error>),

    #[error("Missing configuration value: {0}")]
    Missing(&'static str),
}

/// Configuration loader that handles file discovery and merging
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from all sources with proper priority
    ///
    /// Priority (lowest to highest):
    /// 1. Default values
    /// 2. Global config: `$XDG_CONFIG_HOME/mcp-agent/config.toml`
    /// 3. Project root: `./mcp-agent.toml` or `./.mcp-agent.toml`
    /// 4. Explicit config path (if provided)
    /// 5. `MCP_AGENT_*` environment variables
    /// 6. Legacy flat environment variables (`LLM_CHOICE`, `MCP_SERVER_URL`, ...)
    pub fn load(config_path: Option<&Path>) -> Result<FileConfig, ConfigError> {
        Self::figment(config_path)?
            .extract()
            .map_err(|e| ConfigError::Invalid(Box::new(e)))
    }

    fn figment(config_path: Option<&Path>) -> Result<Figment, ConfigError> {
        let mut figment = Figment::new().merge(Serialized::defaults(FileConfig::default()));

        if let Some(global_path) = Self::global_config_path()
            && global_path.exists()
        {
            figment = figment.merge(Toml::file(&global_path));
        }

        if let Some(path) = Self::project_config_path() {
            figment = figment.merge(Toml::file(&path));
        }

        if let Some(path) = config_path {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            figment = figment.merge(Toml::file(path));
        }

        Ok(figment
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .merge(Self::legacy_env()))
    }

    fn legacy_env() -> Env {
        Env::raw().filter_map(|key| {
            LEGACY_ENV
                .iter()
                .find(|(name, _)| key.as_str().eq_ignore_ascii_case(name))
                .map(|(_, path)| (*path).into())
        })
    }

    /// Load only default configuration
    pub fn load_defaults() -> FileConfig {
        FileConfig::default()
    }

    /// Get the global config file path
    pub fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("mcp-agent").join("config.toml"))
    }

    /// Get the project-level config file path (if it exists)
    pub fn project_config_path() -> Option<PathBuf> {
        PROJECT_FILES
            .iter()
            .map(PathBuf::from)
            .find(|path| path.exists())
    }
}
