//! Run progress port.
//!
//! [`RunProgressNotifier`] is an output port the presentation layer may
//! implement to follow a run as it happens (the one-shot `ask` command prints
//! tool activity to stderr). The HTTP API uses [`NoRunProgress`].

use mcp_agent_domain::{RunId, ToolCallRequest, ToolCallResult};

/// Progress notifier for agent runs.
///
/// All methods have default no-op implementations, so implementers only
/// need to override the callbacks they care about.
pub trait RunProgressNotifier: Send + Sync {
    /// Called before each LLM consultation (1-based)
    fn on_llm_call(&self, _run_id: &RunId, _call_number: usize) {}

    /// Called when a tool call is dispatched
    fn on_tool_call(&self, _run_id: &RunId, _call: &ToolCallRequest) {}

    /// Called when a tool call finishes (success or error)
    fn on_tool_result(&self, _run_id: &RunId, _result: &ToolCallResult) {}

    /// Called once when the run reaches a final answer
    fn on_complete(&self, _run_id: &RunId, _answer: &str) {}
}

/// No-op progress notifier
pub struct NoRunProgress;

impl RunProgressNotifier for NoRunProgress {}
