//! Command-line interface definitions

pub mod commands;
pub mod logging;

pub use commands::{Cli, Command, LogFormat};
pub use logging::init_tracing;
