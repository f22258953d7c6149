//! Tool invocation use case.
//!
//! [`ToolInvocationGateway`] executes one model-requested call against the
//! tool server. It never fails: every problem (unknown tool, bad arguments,
//! timeout, transport or tool-reported error, cancellation) becomes an error
//! [`ToolCallResult`] that is appended to the conversation for the model to
//! react to.

use crate::ports::tool_server::{ToolServer, ToolServerError};
use crate::use_cases::tool_helpers::tool_args_preview;
use mcp_agent_domain::util::preview;
use mcp_agent_domain::{
    DefaultToolValidator, ToolCallRequest, ToolCallResult, ToolCatalog, ToolError, ToolValidator,
};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Dispatches tool calls to the tool server.
#[derive(Clone)]
pub struct ToolInvocationGateway {
    server: Arc<dyn ToolServer>,
    validator: Arc<dyn ToolValidator + Send + Sync>,
    timeout: Duration,
}

impl ToolInvocationGateway {
    pub fn new(server: Arc<dyn ToolServer>, timeout: Duration) -> Self {
        Self {
            server,
            validator: Arc::new(DefaultToolValidator),
            timeout,
        }
    }

    pub fn with_validator(mut self, validator: Arc<dyn ToolValidator + Send + Sync>) -> Self {
        self.validator = validator;
        self
    }

    /// Invoke `call` using the descriptors in `catalog`.
    pub async fn invoke(
        &self,
        call: &ToolCallRequest,
        catalog: &ToolCatalog,
        cancellation: &CancellationToken,
    ) -> ToolCallResult {
        let Some(descriptor) = catalog.get(&call.tool_name) else {
            warn!(call_id = %call.id, "Model requested unknown tool '{}'", call.tool_name);
            return ToolCallResult::failure(
                &call.id,
                &call.tool_name,
                ToolError::not_found(&call.tool_name),
            );
        };

        if let Err(message) = self.validator.validate(call, descriptor) {
            debug!(call_id = %call.id, tool = %call.tool_name, "Rejected arguments: {}", message);
            return ToolCallResult::failure(
                &call.id,
                &call.tool_name,
                ToolError::invalid_argument(message),
            );
        }

        debug!(
            call_id = %call.id,
            tool = %call.tool_name,
            "Calling tool ({})",
            tool_args_preview(call)
        );

        let started = Instant::now();
        let outcome = tokio::select! {
            _ = cancellation.cancelled() => Err(None),
            result = tokio::time::timeout(
                self.timeout,
                self.server.call_tool(&call.tool_name, &call.arguments),
            ) => match result {
                Ok(inner) => inner.map_err(Some),
                Err(_) => Err(Some(ToolServerError::Timeout)),
            },
        };
        let duration_ms = started.elapsed().as_millis() as u64;

        let result = match outcome {
            Ok(output) => {
                info!(
                    call_id = %call.id,
                    tool = %call.tool_name,
                    duration_ms,
                    bytes = output.len(),
                    "Tool call succeeded"
                );
                debug!(call_id = %call.id, "Tool output: {}", preview(&output, 200));
                ToolCallResult::success(&call.id, &call.tool_name, output)
            }
            Err(Some(e)) => {
                warn!(
                    call_id = %call.id,
                    tool = %call.tool_name,
                    duration_ms,
                    "Tool call failed: {}",
                    e
                );
                ToolCallResult::failure(&call.id, &call.tool_name, e.into_tool_error(&call.tool_name))
            }
            Err(None) => {
                info!(call_id = %call.id, tool = %call.tool_name, "Tool call cancelled");
                ToolCallResult::failure(
                    &call.id,
                    &call.tool_name,
                    ToolError::cancelled(&call.tool_name),
                )
            }
        };

        result.with_duration(duration_ms)
    }
}
