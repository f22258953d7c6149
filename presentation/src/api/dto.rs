//! Request and response bodies of the HTTP API

use mcp_agent_domain::{ToolCatalog, ToolDescriptor};
use serde::{Deserialize, Serialize};

/// `POST /agent` body
#[derive(Debug, Clone, Deserialize)]
pub struct AgentRequest {
    pub prompt: String,
    #[serde(default)]
    pub instructions: Option<String>,
}

/// `POST /agent` success body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentResponse {
    pub result: String,
    pub run_id: String,
    pub iterations: usize,
}

/// Error body for every failing endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error_kind: String,
    pub message: String,
}

/// `GET /`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusResponse {
    pub status: String,
    pub service: String,
}

/// `GET /health`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
    pub llm: LlmHealth,
    pub mcp: McpHealth,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmHealth {
    pub backend: String,
    pub model: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct McpHealth {
    pub url: String,
    pub tools: usize,
}

/// One entry of `GET /tools`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolSummary {
    pub name: String,
    pub description: String,
    pub parameters: Vec<ParameterSummary>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParameterSummary {
    pub name: String,
    #[serde(rename = "type")]
    pub param_type: String,
    pub required: bool,
    #[serde(skip_serializing_if = "String::is_empty", default)]
    pub description: String,
}

impl From<&ToolDescriptor> for ToolSummary {
    fn from(tool: &ToolDescriptor) -> Self {
        Self {
            name: tool.name.clone(),
            description: tool.description.clone(),
            parameters: tool
                .parameter_schema
                .parameters
                .iter()
                .map(|p| ParameterSummary {
                    name: p.name.clone(),
                    param_type: p.param_type.clone(),
                    required: p.required,
                    description: p.description.clone(),
                })
                .collect(),
        }
    }
}

/// `GET /tools` and `POST /tools/refresh`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolsResponse {
    pub count: usize,
    pub tools: Vec<ToolSummary>,
}

impl From<&ToolCatalog> for ToolsResponse {
    fn from(catalog: &ToolCatalog) -> Self {
        Self {
            count: catalog.len(),
            tools: catalog.all().map(ToolSummary::from).collect(),
        }
    }
}
