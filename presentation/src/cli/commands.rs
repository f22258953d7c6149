//! CLI command definitions

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Log output format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    /// Human-readable lines
    #[default]
    Text,
    /// One JSON object per line
    Json,
}

/// CLI arguments for mcp-agent
#[derive(Parser, Debug)]
#[command(name = "mcp-agent")]
#[command(author, version, about = "LLM agent service with MCP tools")]
#[command(long_about = r#"
mcp-agent answers prompts with a language model that can call tools published
by an MCP server. It runs as an HTTP service (POST /agent) or one-shot from the
command line.

Configuration files are loaded from (in priority order):
1. --config <path>        Explicit config file
2. ./mcp-agent.toml       Project-level config
3. ~/.config/mcp-agent/config.toml   Global config

Environment variables override files: MCP_AGENT_<SECTION>__<KEY>, plus
LLM_CHOICE, OLLAMA_MODEL, OLLAMA_BASE_URL, OLLAMA_TIMEOUT, LITELLM_MODEL,
LITELLM_API_KEY, LITELLM_API_BASE and MCP_SERVER_URL.

Example:
  mcp-agent serve --port 8000
  mcp-agent ask "Fetch Markdown for node 1234 and summarize it"
  mcp-agent tools
"#)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Path to configuration file
    #[arg(long, value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Address to bind the HTTP server to (overrides config)
    #[arg(long, value_name = "ADDR", global = true)]
    pub bind: Option<String>,

    /// Port to listen on (overrides config)
    #[arg(long, global = true)]
    pub port: Option<u16>,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Log output format
    #[arg(long, value_enum, default_value = "text", global = true)]
    pub log_format: LogFormat,

    /// Print the effective configuration (secrets masked) and exit
    #[arg(long)]
    pub show_config: bool,
}

impl Cli {
    /// The subcommand to run; `serve` when none is given.
    pub fn command(&self) -> Command {
        self.command.clone().unwrap_or(Command::Serve)
    }
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Run the HTTP API (default)
    Serve,

    /// Run one prompt through the agent and print the answer
    Ask {
        /// The prompt to answer
        prompt: String,

        /// Optional system instructions
        #[arg(short, long)]
        instructions: Option<String>,

        /// Suppress progress output
        #[arg(short, long)]
        quiet: bool,
    },

    /// List the tools discovered on the MCP server
    Tools,
}
