//! Ollama backend.
//!
//! Talks to a self-hosted Ollama server through its `/api/chat` endpoint with
//! `stream: false`. Ollama never assigns tool call ids, so they are
//! synthesized from the conversation position.

use super::{SamplingOptions, check_status, parse_arguments, send_error};
use async_trait::async_trait;
use mcp_agent_application::{BackendError, LlmBackend};
use mcp_agent_domain::{
    ContentBlock, Conversation, LlmResponse, Message, Outcome, StopReason, ToolCatalog,
    ToolDescriptor,
};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

pub struct OllamaBackend {
    client: Client,
    base_url: String,
    model: String,
    timeout: Duration,
    sampling: SamplingOptions,
}

impl OllamaBackend {
    /// # Arguments
    /// * `base_url` - Base URL of the Ollama server (e.g., "http://localhost:11434").
    /// * `model` - Model to use (e.g., "llama3.1:8b").
    /// * `timeout` - Bound on one completion request.
    pub fn new(base_url: impl Into<String>, model: impl Into<String>, timeout: Duration) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            model: model.into(),
            timeout,
            sampling: SamplingOptions::default(),
        }
    }

    pub fn with_sampling(mut self, sampling: SamplingOptions) -> Self {
        self.sampling = sampling;
        self
    }

    fn chat_url(&self) -> String {
        format!("{}/api/chat", self.base_url)
    }

    fn build_request(&self, conversation: &Conversation, tools: &ToolCatalog) -> OllamaChatRequest {
        OllamaChatRequest {
            model: self.model.clone(),
            messages: conversation.messages().iter().map(Into::into).collect(),
            tools: (!tools.is_empty()).then(|| tools.all().map(Into::into).collect()),
            stream: false,
            options: OllamaOptions {
                temperature: self.sampling.temperature,
                top_p: self.sampling.top_p,
            },
        }
    }
}

#[async_trait]
impl LlmBackend for OllamaBackend {
    fn name(&self) -> &str {
        "ollama"
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
            "Sending chat request to Ollama"
        );

        let response = self
            .client
            .post(self.chat_url())
            .json(&request)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| send_error(e, self.timeout))?;

        let response: OllamaChatResponse = check_status(response)
            .await?
            .json()
            .await
            .map_err(|e| BackendError::Malformed(format!("Failed to parse Ollama response: {}", e)))?;

        let response = response.into_llm_response(conversation)?;
        debug!(
            stop_reason = ?response.stop_reason,
            has_tool_calls = response.has_tool_calls(),
            "Received chat response from Ollama"
        );

        Ok(response.into_outcome(tools)?)
    }
}

// Ollama API types

#[derive(Debug, Serialize)]
struct OllamaChatRequest {
    model: String,
    messages: Vec<OllamaMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tools: Option<Vec<OllamaTool>>,
    stream: bool,
    options: OllamaOptions,
}

#[derive(Debug, Serialize)]
struct OllamaOptions {
    temperature: f32,
    top_p: f32,
}

#[derive(Debug, Serialize, Deserialize)]
struct OllamaMessage {
    role: String,
    #[serde(default)]
    content: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    tool_calls: Vec<OllamaToolCall>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    tool_name: Option<String>,
}

impl From<&Message> for OllamaMessage {
    fn from(msg: &Message) -> Self {
        OllamaMessage {
            role: msg.role.as_str().to_string(),
            content: msg.content.clone(),
            tool_calls: msg
                .tool_calls
                .iter()
                .map(|call| OllamaToolCall {
                    function: OllamaFunctionCall {
                        name: call.tool_name.clone(),
                        arguments: call.arguments_value(),
                    },
                })
                .collect(),
            tool_name: msg.tool_name.clone(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct OllamaToolCall {
    function: OllamaFunctionCall,
}

#[derive(Debug, Serialize, Deserialize)]
struct OllamaFunctionCall {
    name: String,
    #[serde(default)]
    arguments: serde_json::Value,
}

#[derive(Debug, Serialize)]
struct OllamaTool {
    #[serde(rename = "type")]
    tool_type: &'static str,
    function: OllamaFunctionDef,
}

impl From<&ToolDescriptor> for OllamaTool {
    fn from(tool: &ToolDescriptor) -> Self {
        OllamaTool {
            tool_type: "function",
            function: OllamaFunctionDef {
                name: tool.name.clone(),
                description: tool.description.clone(),
                parameters: tool.parameter_schema.raw.clone(),
            },
        }
    }
}

#[derive(Debug, Serialize)]
struct OllamaFunctionDef {
    name: String,
    description: String,
    parameters: serde_json::Value,
}

#[derive(Debug, Deserialize)]
struct OllamaChatResponse {
    message: OllamaMessage,
    #[serde(default)]
    done_reason: Option<String>,
    #[serde(default)]
    model: Option<String>,
}

impl OllamaChatResponse {
    fn into_llm_response(self, conversation: &Conversation) -> Result<LlmResponse, BackendError> {
        let mut content = Vec::new();
        if !self.message.content.is_empty() {
            content.push(ContentBlock::text(self.message.content));
        }

        let has_tool_calls = !self.message.tool_calls.is_empty();
        for (i, call) in self.message.tool_calls.into_iter().enumerate() {
            let input = parse_arguments(&call.function.name, call.function.arguments)?;
            content.push(ContentBlock::tool_use(
                conversation.next_call_id(i),
                call.function.name,
                input,
            ));
        }

        let stop_reason = if has_tool_calls {
            Some(StopReason::ToolUse)
        } else {
            self.done_reason.as_deref().map(StopReason::from_provider)
        };

        Ok(LlmResponse {
            content,
            stop_reason,
            model: self.model,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mcp_agent_domain::{ToolCallRequest, ToolCallResult, ToolParameter};

    fn catalog() -> ToolCatalog {
        ToolCatalog::new(vec![
            ToolDescriptor::new("get_markdown_content", "Fetch Markdown for a node")
                .with_parameter(ToolParameter::new("node_id", "Alfresco node id", true)),
        ])
        .unwrap()
    }

    fn backend() -> OllamaBackend {
        OllamaBackend::new("http://ollama:11434/", "llama3.1:8b", Duration::from_secs(5))
    }

    #[test]
    fn test_chat_url_trims_trailing_slash() {
        assert_eq!(backend().chat_url(), "http://ollama:11434/api/chat");
    }

    #[test]
    fn test_request_shape() {
        let mut conversation = Conversation::seed(Some("Be terse."), "Summarize node X");
        conversation.push(Message::assistant_tool_calls(vec![
            ToolCallRequest::new("call_2_0", "get_markdown_content").with_arg("node_id", "X"),
        ]));
        conversation.push(Message::tool_result(&ToolCallResult::success(
            "call_2_0",
            "get_markdown_content",
            "# Title",
        )));

        let request = backend().build_request(&conversation, &catalog());
        let json = serde_json::to_value(&request).unwrap();

        assert_eq!(json["model"], "llama3.1:8b");
        assert_eq!(json["stream"], false);
        assert_eq!(json["options"]["top_p"], serde_json::json!(0.9f32));
        assert_eq!(json["messages"][0]["role"], "system");
        assert_eq!(json["messages"][1]["role"], "user");
        assert_eq!(
            json["messages"][2]["tool_calls"][0]["function"]["arguments"]["node_id"],
            "X"
        );
        assert_eq!(json["messages"][3]["role"], "tool");
        assert_eq!(json["messages"][3]["tool_name"], "get_markdown_content");
        assert_eq!(json["tools"][0]["type"], "function");
        assert_eq!(json["tools"][0]["function"]["name"], "get_markdown_content");
        assert_eq!(
            json["tools"][0]["function"]["parameters"]["required"][0],
            "node_id"
        );
    }

    #[test]
    fn test_request_omits_empty_tools() {
        let request = backend().build_request(&Conversation::seed(None, "hi"), &ToolCatalog::empty());
        let json = serde_json::to_value(&request).unwrap();
        assert!(json.get("tools").is_none());
    }

    #[test]
    fn test_text_response() {
        let raw = serde_json::json!({
            "model": "llama3.1:8b",
            "message": { "role": "assistant", "content": "I can fetch Markdown." },
            "done": true,
            "done_reason": "stop"
        });
        let response: OllamaChatResponse = serde_json::from_value(raw).unwrap();
        let response = response
            .into_llm_response(&Conversation::seed(None, "hi"))
            .unwrap();

        assert_eq!(response.stop_reason, Some(StopReason::EndTurn));
        assert_eq!(
            response.into_outcome(&catalog()).unwrap(),
            Outcome::FinalAnswer("I can fetch Markdown.".to_string())
        );
    }

    #[test]
    fn test_tool_call_response_gets_synthesized_ids() {
        let raw = serde_json::json!({
            "message": {
                "role": "assistant",
                "content": "",
                "tool_calls": [
                    { "function": { "name": "get_markdown_content", "arguments": { "node_id": "A" } } },
                    { "function": { "name": "get_markdown_content", "arguments": "{\"node_id\": \"B\"}" } }
                ]
            },
            "done": true
        });
        let conversation = Conversation::seed(None, "compare A and B");
        let response: OllamaChatResponse = serde_json::from_value(raw).unwrap();

        let outcome = response
            .into_llm_response(&conversation)
            .unwrap()
            .into_outcome(&catalog())
            .unwrap();
        match outcome {
            Outcome::ToolCallsRequested(calls) => {
                assert_eq!(calls.len(), 2);
                assert_eq!(calls[0].id, conversation.next_call_id(0));
                assert_eq!(calls[1].id, conversation.next_call_id(1));
                assert_eq!(calls[1].get_string("node_id"), Some("B"));
            }
            other => panic!("expected tool calls, got {:?}", other),
        }
    }

    #[test]
    fn test_unknown_tool_is_malformed() {
        let raw = serde_json::json!({
            "message": {
                "role": "assistant",
                "content": "",
                "tool_calls": [{ "function": { "name": "rm_rf", "arguments": {} } }]
            },
            "done": true
        });
        let response: OllamaChatResponse = serde_json::from_value(raw).unwrap();
        let err = response
            .into_llm_response(&Conversation::seed(None, "hi"))
            .unwrap()
            .into_outcome(&catalog())
            .unwrap_err();
        assert!(err.to_string().contains("rm_rf"));
    }
}
