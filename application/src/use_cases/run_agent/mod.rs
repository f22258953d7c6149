//! Run Agent use case
//!
//! Drives one [`AgentRun`] from its seeded conversation to a terminal state:
//!
//! 1. Consult the LLM backend with the conversation and the tool catalog
//! 2. On a final answer: append it and complete
//! 3. On tool calls: check the iteration cap, execute the batch through the
//!    [`ToolInvocationGateway`] (bounded concurrency, results in request
//!    order), append one tool message per call, then go back to 1
//!
//! Backend errors, the iteration cap and cancellation end the run as failed.
//! Tool errors never do: they are appended for the model to see.

mod types;

pub use types::{RunAgentError, RunAgentInput, RunAgentOutput, ValidationError};

use crate::config::ExecutionParams;
use crate::ports::llm_backend::LlmBackend;
use crate::ports::run_progress::{NoRunProgress, RunProgressNotifier};
use crate::use_cases::discover_tools::ToolRegistry;
use crate::use_cases::invoke_tool::ToolInvocationGateway;
use crate::use_cases::shared::{check_cancelled, consult_cancellable};
use futures::StreamExt;
use mcp_agent_domain::util::truncate_str;
use mcp_agent_domain::{
    AgentRun, Conversation, Outcome, RunId, ToolCallRequest, ToolCallResult, ToolCatalog,
};
use std::sync::Arc;
use std::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{Instrument, debug, info, info_span, warn};

/// Use case for running the agent loop
#[derive(Clone)]
pub struct RunAgentUseCase {
    backend: Arc<dyn LlmBackend>,
    registry: Arc<ToolRegistry>,
    gateway: ToolInvocationGateway,
    params: ExecutionParams,
}

impl RunAgentUseCase {
    pub fn new(
        backend: Arc<dyn LlmBackend>,
        registry: Arc<ToolRegistry>,
        params: ExecutionParams,
    ) -> Self {
        let gateway = ToolInvocationGateway::new(registry.server().clone(), params.tool_timeout);
        Self {
            backend,
            registry,
            gateway,
            params,
        }
    }

    /// Replace the invocation gateway (e.g. to install a custom validator).
    pub fn with_gateway(mut self, gateway: ToolInvocationGateway) -> Self {
        self.gateway = gateway;
        self
    }

    pub fn backend(&self) -> &Arc<dyn LlmBackend> {
        &self.backend
    }

    pub fn registry(&self) -> &Arc<ToolRegistry> {
        &self.registry
    }

    pub fn params(&self) -> &ExecutionParams {
        &self.params
    }

    /// Execute a run to completion.
    pub async fn execute(
        &self,
        input: RunAgentInput,
        cancellation: &CancellationToken,
    ) -> Result<RunAgentOutput, RunAgentError> {
        self.execute_with_progress(input, &NoRunProgress, cancellation)
            .await
    }

    /// Execute a run to completion with progress callbacks.
    pub async fn execute_with_progress(
        &self,
        input: RunAgentInput,
        progress: &dyn RunProgressNotifier,
        cancellation: &CancellationToken,
    ) -> Result<RunAgentOutput, RunAgentError> {
        let span = info_span!("agent_run", run_id = %input.run_id);
        self.run(input, progress, cancellation).instrument(span).await
    }

    async fn run(
        &self,
        input: RunAgentInput,
        progress: &dyn RunProgressNotifier,
        cancellation: &CancellationToken,
    ) -> Result<RunAgentOutput, RunAgentError> {
        let started = Instant::now();
        let catalog = self.registry.snapshot();

        info!(
            tools = catalog.len(),
            max_iterations = self.params.max_iterations,
            "Starting agent run for prompt: {}",
            truncate_str(&input.prompt, 100)
        );

        let conversation = Conversation::seed(
            input.instructions.as_deref(),
            self.params.decorate_prompt(&input.prompt),
        );
        let mut run = AgentRun::new(input.run_id, conversation, self.params.max_iterations);

        self.drive(&mut run, &catalog, progress, cancellation)
            .await?;

        let duration_ms = started.elapsed().as_millis() as u64;
        match run.failure() {
            None => info!(
                iterations = run.iteration_count(),
                llm_calls = run.llm_calls(),
                tool_invocations = run.tool_invocations(),
                duration_ms,
                "Agent run completed"
            ),
            Some(failure) => warn!(
                error_kind = %failure.kind(),
                iterations = run.iteration_count(),
                llm_calls = run.llm_calls(),
                tool_invocations = run.tool_invocations(),
                duration_ms,
                "Agent run failed: {}",
                failure
            ),
        }

        Ok(RunAgentOutput::from(run))
    }

    async fn drive(
        &self,
        run: &mut AgentRun,
        catalog: &ToolCatalog,
        progress: &dyn RunProgressNotifier,
        cancellation: &CancellationToken,
    ) -> Result<(), RunAgentError> {
        loop {
            run.begin_llm_call()?;
            progress.on_llm_call(run.id(), run.llm_calls());

            let outcome = match consult_cancellable(
                self.backend.as_ref(),
                run.conversation(),
                catalog,
                self.params.llm_timeout,
                cancellation,
            )
            .await
            {
                Ok(outcome) => outcome,
                Err(failure) => {
                    run.fail(failure);
                    return Ok(());
                }
            };

            let calls = match outcome {
                Outcome::FinalAnswer(text) => {
                    progress.on_complete(run.id(), &text);
                    run.complete(text)?;
                    return Ok(());
                }
                Outcome::ToolCallsRequested(calls) => calls,
            };

            debug!(
                iteration = run.iteration_count() + 1,
                calls = calls.len(),
                "Model requested tools: [{}]",
                calls
                    .iter()
                    .map(|c| c.tool_name.as_str())
                    .collect::<Vec<_>>()
                    .join(", ")
            );

            run.request_tools(calls)?;
            if run.phase().is_terminal() {
                return Ok(());
            }

            let results = self
                .execute_tools(run.id(), run.pending_calls(), catalog, progress, cancellation)
                .await;

            if let Err(failure) = check_cancelled(cancellation) {
                run.fail(failure);
                return Ok(());
            }

            run.record_tool_results(results)?;
        }
    }

    /// Execute one batch; results come back in request order.
    async fn execute_tools(
        &self,
        run_id: &RunId,
        calls: &[ToolCallRequest],
        catalog: &ToolCatalog,
        progress: &dyn RunProgressNotifier,
        cancellation: &CancellationToken,
    ) -> Vec<ToolCallResult> {
        let results: Vec<ToolCallResult> = futures::stream::iter(calls.iter().map(|call| {
            progress.on_tool_call(run_id, call);
            self.gateway.invoke(call, catalog, cancellation)
        }))
        .boxed()
        .buffered(self.params.tool_concurrency.max(1))
        .collect()
        .await;

        for result in &results {
            progress.on_tool_result(run_id, result);
        }
        results
    }
}
