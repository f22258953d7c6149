//! OpenAI-compatible backend.
//!
//! Works with a LiteLLM proxy, the OpenAI API, and anything else that
//! implements the chat completions API.

use super::{SamplingOptions, check_status, parse_arguments, send_error};
use async_trait::async_trait;
use mcp_agent_application::{BackendError, LlmBackend};
use mcp_agent_domain::{
    ContentBlock, Conversation, LlmResponse, Message, Outcome, Role, StopReason, ToolCatalog,
    ToolDescriptor,
};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

pub struct OpenAiBackend {
    client: Client,
    url: String,
    model: String,
    api_key: Option<String>,
    timeout: Duration,
    sampling: SamplingOptions,
}

impl OpenAiBackend {
    /// # Arguments
    /// * `api_base` - Base URL (e.g., "http://litellm:4000" or "https://api.openai.com/v1").
    /// * `model` - Model to use (e.g., "gpt-4o-mini").
    /// * `api_key` - Optional bearer token.
    /// * `timeout` - Bound on one completion request.
    pub fn new(
        api_base: impl Into<String>,
        model: impl Into<String>,
        api_key: Option<String>,
        timeout: Duration,
    ) -> Self {
        Self {
            client: Client::new(),
            url: completions_url(&api_base.into()),
            model: model.into(),
            api_key,
            timeout,
            sampling: SamplingOptions::default(),
        }
    }

    pub fn with_sampling(mut self, sampling: SamplingOptions) -> Self {
        self.sampling = sampling;
        self
    }

    fn build_request(&self, conversation: &Conversation, tools: &ToolCatalog) -> OpenAiChatRequest {
        OpenAiChatRequest {
            model: self.model.clone(),
            messages: conversation.messages().iter().map(Into::into).collect(),
            tools: (!tools.is_empty()).then(|| tools.all().map(Into::into).collect()),
            temperature: self.sampling.temperature,
            top_p: self.sampling.top_p,
        }
    }
}

/// `{base}/v1/chat/completions`, unless the base already ends in `/v1`.
fn completions_url(api_base: &str) -> String {
    let base = api_base.trim_end_matches('/');
    if base.ends_with("/v1") {
        format!("{}/chat/completions", base)
    } else {
        format!("{}/v1/chat/completions", base)
    }
}

#[async_trait]
impl LlmBackend for OpenAiBackend {
    fn name(&self) -> &str {
        "openai"
    }

    fn model(&self) -> &str {
        &self.model
    }

    async fn complete(
        &self,
        conversation: &Conversation,
        tools: &ToolCatalog,
    ) -> Result<Outcome, BackendError> {
        let request = self.build_request(conversation, tools);

        debug!(
            model = %self.model,
            message_count = conversation.len(),
            tool_count = tools.len(),
            "Sending completion request to OpenAI-compatible API"
        );

        let mut req_builder = self.client.post(&self.url).json(&request);
        if let Some(api_key) = &self.api_key {
            req_builder = req_builder.bearer_auth(api_key);
        }

        let response = req_builder
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| send_error(e, self.timeout))?;

        let response: OpenAiChatResponse = check_status(response).await?.json().await.map_err(|e| {
            BackendError::Malformed(format!("Failed to parse OpenAI response: {}", e))
        })?;

        let response = response.into_llm_response()?;
        debug!(
            stop_reason = ?response.stop_reason,
            has_tool_calls = response.has_tool_calls(),
            "Received completion response from OpenAI-compatible API"
        );

        Ok(response.into_outcome(tools)?)
    }
}

// OpenAI API types

#[derive(Debug, Serialize)]
struct OpenAiChatRequest {
    model: String,
    messages: Vec<OpenAiMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tools: Option<Vec<OpenAiTool>>,
    temperature: f32,
    top_p: f32,
}

#[derive(Debug, Serialize)]
struct OpenAiMessage {
    role: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    content: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    tool_calls: Vec<OpenAiToolCallRequest>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tool_call_id: Option<String>,
}

impl From<&Message> for OpenAiMessage {
    fn from(msg: &Message) -> Self {
        // Assistant tool-call turns carry no text; every other role sends its content
        let content = if msg.role == Role::Assistant && msg.content.is_empty() {
            None
        } else {
            Some(msg.content.clone())
        };

        OpenAiMessage {
            role: msg.role.as_str(),
            content,
            tool_calls: msg
                .tool_calls
                .iter()
                .map(|call| OpenAiToolCallRequest {
                    id: call.id.clone(),
                    r#type: "function",
                    function: OpenAiFunctionCallRequest {
                        name: call.tool_name.clone(),
                        arguments: call.arguments_value().to_string(),
                    },
                })
                .collect(),
            tool_call_id: msg.tool_call_id.clone(),
        }
    }
}

#[derive(Debug, Serialize)]
struct OpenAiToolCallRequest {
    id: String,
    r#type: &'static str,
    function: OpenAiFunctionCallRequest,
}

#[derive(Debug, Serialize)]
struct OpenAiFunctionCallRequest {
    name: String,
    arguments: String,
}

#[derive(Debug, Serialize)]
struct OpenAiTool {
    #[serde(rename = "type")]
    tool_type: &'static str,
    function: OpenAiFunctionDef,
}

impl From<&ToolDescriptor> for OpenAiTool {
    fn from(tool: &ToolDescriptor) -> Self {
        OpenAiTool {
            tool_type: "function",
            function: OpenAiFunctionDef {
                name: tool.name.clone(),
                description: tool.description.clone(),
                parameters: tool.parameter_schema.raw.clone(),
            },
        }
    }
}

#[derive(Debug, Serialize)]
struct OpenAiFunctionDef {
    name: String,
    description: String,
    parameters: serde_json::Value,
}

#[derive(Debug, Deserialize)]
struct OpenAiChatResponse {
    choices: Vec<OpenAiChoice>,
    #[serde(default)]
    model: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OpenAiChoice {
    message: OpenAiResponseMessage,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OpenAiResponseMessage {
    #[serde(default)]
    content: Option<String>,
    #[serde(default)]
    tool_calls: Option<Vec<OpenAiToolCallResponse>>,
}

#[derive(Debug, Deserialize)]
struct OpenAiToolCallResponse {
    #[serde(default)]
    id: String,
    function: OpenAiFunctionCallResponse,
}

#[derive(Debug, Deserialize)]
struct OpenAiFunctionCallResponse {
    name: String,
    #[serde(default)]
    arguments: serde_json::Value,
}

impl OpenAiChatResponse {
    fn into_llm_response(self) -> Result<LlmResponse, BackendError> {
        let choice = self
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| BackendError::Malformed("No choices in OpenAI response".to_string()))?;

        let mut content = Vec::new();
        if let Some(text) = choice.message.content.filter(|t| !t.is_empty()) {
            content.push(ContentBlock::text(text));
        }
        for call in choice.message.tool_calls.unwrap_or_default() {
            let input = parse_arguments(&call.function.name, call.function.arguments)?;
            content.push(ContentBlock::tool_use(call.id, call.function.name, input));
        }

        Ok(LlmResponse {
            content,
            stop_reason: choice.finish_reason.as_deref().map(StopReason::from_provider),
            model: self.model,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mcp_agent_domain::{DomainError, ToolCallRequest, ToolCallResult, ToolParameter};

    fn catalog() -> ToolCatalog {
        ToolCatalog::new(vec![
            ToolDescriptor::new("get_markdown_content", "Fetch Markdown for a node")
                .with_parameter(ToolParameter::new("node_id", "Alfresco node id", true)),
        ])
        .unwrap()
    }

    fn parse(raw: serde_json::Value) -> Result<LlmResponse, BackendError> {
        serde_json::from_value::<OpenAiChatResponse>(raw)
            .unwrap()
            .into_llm_response()
    }

    #[test]
    fn test_completions_url() {
        assert_eq!(
            completions_url("http://litellm:4000"),
            "http://litellm:4000/v1/chat/completions"
        );
        assert_eq!(
            completions_url("https://api.openai.com/v1/"),
            "https://api.openai.com/v1/chat/completions"
        );
    }

    #[test]
    fn test_request_shape() {
        let mut conversation = Conversation::seed(None, "Summarize node X");
        conversation.push(Message::assistant_tool_calls(vec![
            ToolCallRequest::new("call_abc", "get_markdown_content").with_arg("node_id", "X"),
        ]));
        conversation.push(Message::tool_result(&ToolCallResult::success(
            "call_abc",
            "get_markdown_content",
            "# Title",
        )));

        let backend = OpenAiBackend::new(
            "http://litellm:4000",
            "gpt-4o-mini",
            None,
            Duration::from_secs(5),
        );
        let json = serde_json::to_value(backend.build_request(&conversation, &catalog())).unwrap();

        assert_eq!(json["model"], "gpt-4o-mini");
        assert!(json["messages"][1].get("content").is_none());
        let call = &json["messages"][1]["tool_calls"][0];
        assert_eq!(call["id"], "call_abc");
        assert_eq!(call["type"], "function");
        let args: serde_json::Value =
            serde_json::from_str(call["function"]["arguments"].as_str().unwrap()).unwrap();
        assert_eq!(args["node_id"], "X");
        assert_eq!(json["messages"][2]["tool_call_id"], "call_abc");
        assert_eq!(json["messages"][2]["content"], "# Title");
        assert_eq!(json["tools"][0]["function"]["name"], "get_markdown_content");
    }

    #[test]
    fn test_text_response() {
        let response = parse(serde_json::json!({
            "model": "gpt-4o-mini",
            "choices": [{
                "message": { "role": "assistant", "content": "Done." },
                "finish_reason": "stop"
            }]
        }))
        .unwrap();

        assert_eq!(response.stop_reason, Some(StopReason::EndTurn));
        assert_eq!(
            response.into_outcome(&catalog()).unwrap(),
            Outcome::FinalAnswer("Done.".to_string())
        );
    }

    #[test]
    fn test_tool_call_response() {
        let response = parse(serde_json::json!({
            "choices": [{
                "message": {
                    "role": "assistant",
                    "content": null,
                    "tool_calls": [{
                        "id": "call_1",
                        "type": "function",
                        "function": {
                            "name": "get_markdown_content",
                            "arguments": "{\"node_id\": \"abc-123\"}"
                        }
                    }]
                },
                "finish_reason": "tool_calls"
            }]
        }))
        .unwrap();

        match response.into_outcome(&catalog()).unwrap() {
            Outcome::ToolCallsRequested(calls) => {
                assert_eq!(calls[0].id, "call_1");
                assert_eq!(calls[0].get_string("node_id"), Some("abc-123"));
            }
            other => panic!("expected tool calls, got {:?}", other),
        }
    }

    #[test]
    fn test_unparseable_arguments_are_malformed() {
        let err = parse(serde_json::json!({
            "choices": [{
                "message": {
                    "tool_calls": [{
                        "id": "call_1",
                        "function": { "name": "get_markdown_content", "arguments": "{\"node_id\": " }
                    }]
                }
            }]
        }))
        .unwrap_err();
        assert!(matches!(err, BackendError::Malformed(_)));
    }

    #[test]
    fn test_missing_call_id_is_malformed() {
        let response = parse(serde_json::json!({
            "choices": [{
                "message": {
                    "tool_calls": [{
                        "function": { "name": "get_markdown_content", "arguments": "{}" }
                    }]
                }
            }]
        }))
        .unwrap();
        assert!(matches!(
            response.into_outcome(&catalog()),
            Err(DomainError::MalformedResponse(_))
        ));
    }

    #[test]
    fn test_no_choices_is_malformed() {
        let err = parse(serde_json::json!({ "choices": [] })).unwrap_err();
        assert!(matches!(err, BackendError::Malformed(_)));
    }
}
