//! Port definitions (interfaces for external adapters)
//!
//! Ports define the contracts that infrastructure adapters must implement.

pub mod llm_backend;
pub mod run_progress;
pub mod tool_server;
