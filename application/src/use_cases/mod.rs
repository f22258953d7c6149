//! Use cases
//!
//! Application-level operations that orchestrate domain logic.

pub mod discover_tools;
pub mod invoke_tool;
pub mod run_agent;
pub(crate) mod shared;
pub(crate) mod tool_helpers;
