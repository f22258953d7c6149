//! HTTP handlers

use super::dto::{
    AgentRequest, AgentResponse, HealthResponse, LlmHealth, McpHealth, StatusResponse,
    ToolsResponse,
};
use super::error::ApiError;
use super::state::AppState;
use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use mcp_agent_application::{RunAgentInput, RunAgentOutput};
use mcp_agent_domain::util::preview;
use tracing::{error, info, warn};

/// `POST /agent`: run one prompt through the agent loop.
///
/// The run executes on its own task with a child cancellation token. If the
/// client goes away the handler future is dropped, the guard fires, and the
/// run ends as cancelled instead of continuing in the background.
pub async fn run_agent(
    State(state): State<AppState>,
    payload: Result<Json<AgentRequest>, JsonRejection>,
) -> Result<Json<AgentResponse>, ApiError> {
    let Json(request) = payload.map_err(|e| ApiError::Validation(e.body_text()))?;
    let input = RunAgentInput::new(request.prompt, request.instructions)
        .map_err(|e| ApiError::Validation(e.to_string()))?;
    let run_id = input.run_id.clone();

    let cancellation = state.shutdown.child_token();
    let _guard = cancellation.clone().drop_guard();

    let use_case = state.use_case.clone();
    let handle = tokio::spawn(async move { use_case.execute(input, &cancellation).await });

    let output: RunAgentOutput = match handle.await {
        Ok(Ok(output)) => output,
        Ok(Err(e)) => {
            error!(run_id = %run_id, "Agent run aborted: {}", e);
            return Err(ApiError::Internal(e.to_string()));
        }
        Err(e) => {
            error!(run_id = %run_id, "Agent run task failed: {}", e);
            return Err(ApiError::Internal(e.to_string()));
        }
    };

    let iterations = output.iterations;
    match output.into_result() {
        Ok(result) => {
            info!(
                run_id = %run_id,
                iterations,
                output_len = result.len(),
                "Agent response: {}",
                preview(&result, 200)
            );
            Ok(Json(AgentResponse {
                result,
                run_id: run_id.to_string(),
                iterations,
            }))
        }
        Err(failure) => {
            warn!(run_id = %run_id, iterations, "Agent run failed: {}", failure);
            Err(ApiError::RunFailed(failure))
        }
    }
}

/// `GET /`
pub async fn status(State(state): State<AppState>) -> Json<StatusResponse> {
    Json(StatusResponse {
        status: "ok".to_string(),
        service: state.service.to_string(),
    })
}

/// `GET /health`: configuration summary; does not contact the backends.
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let backend = state.use_case.backend();
    let registry = state.use_case.registry();
    Json(HealthResponse {
        status: "ok".to_string(),
        service: state.service.to_string(),
        llm: LlmHealth {
            backend: backend.name().to_string(),
            model: backend.model().to_string(),
        },
        mcp: McpHealth {
            url: registry.server().endpoint().to_string(),
            tools: registry.snapshot().len(),
        },
    })
}

/// `GET /tools`: the active catalog.
pub async fn list_tools(State(state): State<AppState>) -> Json<ToolsResponse> {
    let catalog = state.use_case.registry().snapshot();
    Json(ToolsResponse::from(catalog.as_ref()))
}

/// `POST /tools/refresh`: re-run discovery and swap the catalog.
pub async fn refresh_tools(State(state): State<AppState>) -> Result<Json<ToolsResponse>, ApiError> {
    match state.use_case.registry().refresh().await {
        Ok(catalog) => Ok(Json(ToolsResponse::from(catalog.as_ref()))),
        Err(e) => {
            warn!("Tool catalog refresh failed: {}", e);
            Err(ApiError::ToolDiscovery(e.to_string()))
        }
    }
}
