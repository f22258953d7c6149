//! Shared state of the HTTP API

use mcp_agent_application::RunAgentUseCase;
use tokio_util::sync::CancellationToken;

/// Cloned into every handler.
///
/// Runs get a child of `shutdown`, so cancelling it aborts every in-flight run.
#[derive(Clone)]
pub struct AppState {
    pub use_case: RunAgentUseCase,
    pub shutdown: CancellationToken,
    pub service: &'static str,
}

impl AppState {
    pub fn new(use_case: RunAgentUseCase, shutdown: CancellationToken) -> Self {
        Self {
            use_case,
            shutdown,
            service: "mcp-agent",
        }
    }
}
