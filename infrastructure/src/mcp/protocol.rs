//! JSON-RPC and MCP message types for the streamable HTTP transport.
//!
//! # Protocol Overview
//!
//! - **Requests**: Client → server (`initialize`, `tools/list`, `tools/call`)
//! - **Notifications**: Client → server (`notifications/initialized`), no reply
//! - **Responses**: returned in the POST body, either as `application/json` or
//!   as a `text/event-stream` whose `data:` lines carry JSON-RPC messages

use super::error::{McpError, Result};
use mcp_agent_domain::{ParameterSchema, ToolDescriptor};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};

/// Protocol revision sent in `initialize`.
pub const PROTOCOL_VERSION: &str = "2025-03-26";

/// Global request ID counter for JSON-RPC requests.
static REQUEST_ID: AtomicU64 = AtomicU64::new(1);

/// Generates a unique request ID.
fn next_id() -> u64 {
    REQUEST_ID.fetch_add(1, Ordering::SeqCst)
}

/// JSON-RPC request
#[derive(Debug, Clone, Serialize)]
pub struct JsonRpcRequest {
    pub jsonrpc: &'static str,
    pub id: u64,
    pub method: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub params: Option<serde_json::Value>,
}

impl JsonRpcRequest {
    /// Creates a new JSON-RPC request with an auto-generated ID.
    pub fn new(method: impl Into<String>, params: Option<serde_json::Value>) -> Self {
        Self {
            jsonrpc: "2.0",
            id: next_id(),
            method: method.into(),
            params,
        }
    }
}

/// JSON-RPC notification (no id, no reply)
#[derive(Debug, Clone, Serialize)]
pub struct JsonRpcNotification {
    pub jsonrpc: &'static str,
    pub method: String,
}

impl JsonRpcNotification {
    pub fn new(method: impl Into<String>) -> Self {
        Self {
            jsonrpc: "2.0",
            method: method.into(),
        }
    }
}

/// JSON-RPC response
#[derive(Debug, Clone, Deserialize)]
pub struct JsonRpcResponse {
    pub id: Option<serde_json::Value>,
    pub result: Option<serde_json::Value>,
    pub error: Option<RpcError>,
}

impl JsonRpcResponse {
    fn answers(&self, id: u64) -> bool {
        match &self.id {
            Some(serde_json::Value::Number(n)) => n.as_u64() == Some(id),
            Some(serde_json::Value::String(s)) => s.parse::<u64>().ok() == Some(id),
            _ => false,
        }
    }

    /// Unwrap the result, turning a JSON-RPC error into [`McpError::Rpc`].
    pub fn into_result(self) -> Result<serde_json::Value> {
        if let Some(error) = self.error {
            return Err(McpError::Rpc {
                code: error.code,
                message: error.message,
            });
        }
        self.result.ok_or_else(|| {
            McpError::UnexpectedResponse("response has neither result nor error".into())
        })
    }
}

/// JSON-RPC error object
#[derive(Debug, Clone, Deserialize)]
pub struct RpcError {
    pub code: i64,
    pub message: String,
    #[allow(dead_code)]
    pub data: Option<serde_json::Value>,
}

/// Parameters of the `initialize` request.
pub fn initialize_params() -> serde_json::Value {
    serde_json::json!({
        "protocolVersion": PROTOCOL_VERSION,
        "capabilities": {},
        "clientInfo": {
            "name": "mcp-agent",
            "version": env!("CARGO_PKG_VERSION"),
        }
    })
}

/// Result of `initialize`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InitializeResult {
    pub protocol_version: String,
    #[serde(default)]
    pub server_info: Option<ServerInfo>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerInfo {
    pub name: String,
    #[serde(default)]
    pub version: Option<String>,
}

/// Result of one `tools/list` page
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListToolsResult {
    #[serde(default)]
    pub tools: Vec<McpTool>,
    #[serde(default)]
    pub next_cursor: Option<String>,
}

/// Tool definition as published by the server
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct McpTool {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default = "empty_object_schema")]
    pub input_schema: serde_json::Value,
}

fn empty_object_schema() -> serde_json::Value {
    serde_json::json!({ "type": "object" })
}

impl TryFrom<McpTool> for ToolDescriptor {
    type Error = McpError;

    fn try_from(tool: McpTool) -> Result<Self> {
        let schema = ParameterSchema::from_json_schema(&tool.input_schema).map_err(|e| {
            McpError::InvalidTool {
                name: tool.name.clone(),
                reason: e.to_string(),
            }
        })?;
        Ok(ToolDescriptor::new(tool.name, tool.description.unwrap_or_default())
            .with_schema(schema))
    }
}

/// Result of `tools/call`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CallToolResult {
    #[serde(default)]
    pub content: Vec<ContentItem>,
    #[serde(default)]
    pub structured_content: Option<serde_json::Value>,
    #[serde(default)]
    pub is_error: bool,
}

/// One content block of a tool result
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentItem {
    Text {
        text: String,
    },
    Resource {
        resource: EmbeddedResource,
    },
    #[serde(other)]
    Unsupported,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EmbeddedResource {
    #[serde(default)]
    pub text: Option<String>,
}

impl CallToolResult {
    /// Text blocks joined with newlines; structured content when there is no text.
    pub fn text(&self) -> String {
        let parts: Vec<&str> = self
            .content
            .iter()
            .filter_map(|item| match item {
                ContentItem::Text { text } => Some(text.as_str()),
                ContentItem::Resource { resource } => resource.text.as_deref(),
                ContentItem::Unsupported => None,
            })
            .collect();

        if parts.is_empty()
            && let Some(structured) = &self.structured_content
        {
            return structured.to_string();
        }
        parts.join("\n")
    }

    /// Tool output, or [`McpError::ToolReported`] when `isError` is set.
    pub fn into_output(self) -> Result<String> {
        let text = self.text();
        if self.is_error {
            let message = if text.trim().is_empty() {
                "tool reported an error".to_string()
            } else {
                text
            };
            return Err(McpError::ToolReported(message));
        }
        Ok(text)
    }
}

/// Extract the payloads of a `text/event-stream` body, one per event.
///
/// Multiple `data:` lines of one event are joined with `\n`.
pub fn sse_data_events(body: &str) -> Vec<String> {
    let mut events = Vec::new();
    let mut current: Vec<&str> = Vec::new();

    for line in body.lines() {
        let line = line.strip_suffix('\r').unwrap_or(line);
        if line.is_empty() {
            if !current.is_empty() {
                events.push(current.join("\n"));
                current.clear();
            }
            continue;
        }
        if let Some(data) = line.strip_prefix("data:") {
            current.push(data.strip_prefix(' ').unwrap_or(data));
        }
    }
    if !current.is_empty() {
        events.push(current.join("\n"));
    }
    events
}

/// Find the response to request `id` in a POST response body.
pub fn decode_response(content_type: &str, body: &str, id: u64) -> Result<JsonRpcResponse> {
    if content_type.starts_with("text/event-stream") {
        for event in sse_data_events(body) {
            // Server requests and notifications may be interleaved; skip them
            let Ok(message) = serde_json::from_str::<JsonRpcResponse>(&event) else {
                continue;
            };
            if message.answers(id) {
                return Ok(message);
            }
        }
        return Err(McpError::UnexpectedResponse(format!(
            "event stream closed without a response to request {}",
            id
        )));
    }

    let message: JsonRpcResponse = serde_json::from_str(body)?;
    if !message.answers(id) {
        return Err(McpError::UnexpectedResponse(format!(
            "response id {:?} does not match request {}",
            message.id, id
        )));
    }
    Ok(message)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_ids_increase() {
        let a = JsonRpcRequest::new("tools/list", None);
        let b = JsonRpcRequest::new("tools/list", None);
        assert!(b.id > a.id);

        let json = serde_json::to_value(&a).unwrap();
        assert_eq!(json["jsonrpc"], "2.0");
        assert!(json.get("params").is_none());
    }

    #[test]
    fn test_notification_has_no_id() {
        let json = serde_json::to_value(JsonRpcNotification::new("notifications/initialized")).unwrap();
        assert!(json.get("id").is_none());
        assert_eq!(json["method"], "notifications/initialized");
    }

    #[test]
    fn test_initialize_params() {
        let params = initialize_params();
        assert_eq!(params["protocolVersion"], "2025-03-26");
        assert!(params["clientInfo"]["name"].is_string());
    }

    #[test]
    fn test_sse_data_events() {
        let body = "event: message\r\ndata: {\"a\":1}\r\n\r\n: keep-alive\n\ndata: {\"b\":\ndata: 2}\n";
        assert_eq!(sse_data_events(body), vec!["{\"a\":1}", "{\"b\":\n2}"]);
    }

    #[test]
    fn test_decode_sse_skips_notifications() {
        let body = concat!(
            "event: message\n",
            "data: {\"jsonrpc\":\"2.0\",\"method\":\"notifications/progress\",\"params\":{}}\n\n",
            "event: message\n",
            "data: {\"jsonrpc\":\"2.0\",\"id\":7,\"result\":{\"tools\":[]}}\n\n",
        );
        let response = decode_response("text/event-stream", body, 7).unwrap();
        assert_eq!(response.into_result().unwrap()["tools"], serde_json::json!([]));
    }

    #[test]
    fn test_decode_sse_without_answer() {
        let body = "data: {\"jsonrpc\":\"2.0\",\"id\":1,\"result\":{}}\n\n";
        assert!(matches!(
            decode_response("text/event-stream", body, 2),
            Err(McpError::UnexpectedResponse(_))
        ));
    }

    #[test]
    fn test_decode_json_error() {
        let body = r#"{"jsonrpc":"2.0","id":"3","error":{"code":-32602,"message":"Unknown tool"}}"#;
        let err = decode_response("application/json", body, 3)
            .unwrap()
            .into_result()
            .unwrap_err();
        assert!(matches!(err, McpError::Rpc { code: -32602, .. }));
    }

    #[test]
    fn test_tool_conversion() {
        let tool: McpTool = serde_json::from_value(serde_json::json!({
            "name": "get_markdown_content",
            "description": "Fetch the Markdown rendition of an Alfresco node",
            "inputSchema": {
                "type": "object",
                "properties": { "node_id": { "type": "string" } },
                "required": ["node_id"]
            }
        }))
        .unwrap();

        let descriptor = ToolDescriptor::try_from(tool).unwrap();
        assert_eq!(descriptor.name, "get_markdown_content");
        assert!(descriptor.parameter_schema.get("node_id").unwrap().required);
    }

    #[test]
    fn test_tool_without_schema_or_description() {
        let tool: McpTool = serde_json::from_value(serde_json::json!({ "name": "ping" })).unwrap();
        let descriptor = ToolDescriptor::try_from(tool).unwrap();
        assert_eq!(descriptor.description, "");
        assert!(descriptor.parameter_schema.parameters.is_empty());
    }

    #[test]
    fn test_tool_with_invalid_schema() {
        let tool: McpTool = serde_json::from_value(serde_json::json!({
            "name": "broken",
            "inputSchema": { "type": "array" }
        }))
        .unwrap();
        assert!(matches!(
            ToolDescriptor::try_from(tool),
            Err(McpError::InvalidTool { ref name, .. }) if name == "broken"
        ));
    }

    #[test]
    fn test_call_result_joins_text() {
        let result: CallToolResult = serde_json::from_value(serde_json::json!({
            "content": [
                { "type": "text", "text": "# Title" },
                { "type": "image", "data": "...", "mimeType": "image/png" },
                { "type": "text", "text": "Body" }
            ]
        }))
        .unwrap();
        assert_eq!(result.into_output().unwrap(), "# Title\nBody");
    }

    #[test]
    fn test_call_result_structured_fallback() {
        let result: CallToolResult = serde_json::from_value(serde_json::json!({
            "content": [],
            "structuredContent": { "count": 2 }
        }))
        .unwrap();
        assert_eq!(result.text(), r#"{"count":2}"#);
    }

    #[test]
    fn test_call_result_is_error() {
        let result: CallToolResult = serde_json::from_value(serde_json::json!({
            "content": [{ "type": "text", "text": "Node abc not found" }],
            "isError": true
        }))
        .unwrap();
        assert!(matches!(
            result.into_output(),
            Err(McpError::ToolReported(ref m)) if m == "Node abc not found"
        ));
    }
}
