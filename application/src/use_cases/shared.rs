//! Shared utilities for use cases.
//!
//! Cancellation checking and the cancellable, time-bounded LLM consultation
//! used by [`RunAgentUseCase`](crate::use_cases::run_agent::RunAgentUseCase).

use crate::ports::llm_backend::{BackendError, LlmBackend};
use mcp_agent_domain::{Conversation, Outcome, RunFailure, ToolCatalog};
use std::time::{Duration, Instant};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

/// Returns `Err(RunFailure::Cancelled)` if cancellation has been requested.
pub(crate) fn check_cancelled(token: &CancellationToken) -> Result<(), RunFailure> {
    if token.is_cancelled() {
        return Err(RunFailure::Cancelled);
    }
    Ok(())
}

/// Consult the backend once, bounded by `timeout` and aborted on cancellation.
///
/// Backend errors are logged in full here; the returned failure keeps the
/// detail for the run record only.
pub(crate) async fn consult_cancellable(
    backend: &dyn LlmBackend,
    conversation: &Conversation,
    catalog: &ToolCatalog,
    timeout: Duration,
    cancellation: &CancellationToken,
) -> Result<Outcome, RunFailure> {
    check_cancelled(cancellation)?;

    let started = Instant::now();
    let result = tokio::select! {
        _ = cancellation.cancelled() => return Err(RunFailure::Cancelled),
        result = tokio::time::timeout(timeout, backend.complete(conversation, catalog)) => {
            result.unwrap_or(Err(BackendError::Timeout(timeout)))
        }
    };
    let duration_ms = started.elapsed().as_millis() as u64;

    match result {
        Ok(outcome) => {
            info!(
                backend = backend.name(),
                model = backend.model(),
                duration_ms,
                messages = conversation.len(),
                "LLM consultation finished"
            );
            Ok(outcome)
        }
        Err(e) => {
            warn!(
                backend = backend.name(),
                model = backend.model(),
                duration_ms,
                "LLM consultation failed: {}",
                e
            );
            Err(RunFailure::LlmBackend {
                failure: e.failure(),
                detail: e.to_string(),
            })
        }
    }
}
