//! Presentation layer for mcp-agent
//!
//! This crate contains the HTTP API, CLI definitions, console output and the
//! progress reporter used by one-shot runs.

pub mod api;
pub mod cli;
pub mod output;
pub mod progress;

// Re-export commonly used types
pub use api::{ApiError, AppState, router};
pub use cli::{Cli, Command, LogFormat, init_tracing};
pub use output::ConsoleFormatter;
pub use progress::ProgressReporter;
