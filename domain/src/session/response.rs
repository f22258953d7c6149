//! LLM response types and the per-turn [`Outcome`].
//!
//! Backends return a provider-neutral [`LlmResponse`] made of content blocks.
//! The orchestrator only ever sees the closed [`Outcome`] variant produced by
//! [`LlmResponse::into_outcome`], which enforces the turn policy:
//!
//! - any tool use block makes the turn `ToolCallsRequested` (text is dropped)
//! - a tool name outside the catalog, or a duplicate call id, is malformed
//! - otherwise the concatenated text is the `FinalAnswer`

use crate::core::error::DomainError;
use crate::tool::entities::{ToolCallRequest, ToolCatalog};
use serde::{Deserialize, Serialize};

/// A single block of content within an LLM response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentBlock {
    /// A text content block from the model.
    Text { text: String },

    /// A tool use request from the model.
    ToolUse {
        /// Call id, assigned by the backend or synthesized by the adapter
        id: String,
        /// Tool name as emitted by the model (not yet checked against the catalog)
        name: String,
        /// Structured arguments
        input: serde_json::Map<String, serde_json::Value>,
    },
}

impl ContentBlock {
    pub fn text(text: impl Into<String>) -> Self {
        ContentBlock::Text { text: text.into() }
    }

    pub fn tool_use(
        id: impl Into<String>,
        name: impl Into<String>,
        input: serde_json::Map<String, serde_json::Value>,
    ) -> Self {
        ContentBlock::ToolUse {
            id: id.into(),
            name: name.into(),
            input,
        }
    }

    /// Returns the text content if this is a `Text` block.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            ContentBlock::Text { text } => Some(text),
            _ => None,
        }
    }
}

/// Reason the model stopped generating.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StopReason {
    /// Natural end of response: the model is done.
    EndTurn,
    /// The model wants to call tools.
    ToolUse,
    /// Hit the token limit: response may be truncated.
    MaxTokens,
    /// Provider-specific stop reason.
    Other(String),
}

impl StopReason {
    /// Map an OpenAI-style `finish_reason` / Ollama `done_reason`.
    pub fn from_provider(reason: &str) -> Self {
        match reason {
            "stop" | "end_turn" => StopReason::EndTurn,
            "tool_calls" | "tool_use" => StopReason::ToolUse,
            "length" | "max_tokens" => StopReason::MaxTokens,
            other => StopReason::Other(other.to_string()),
        }
    }
}

/// A structured response from an LLM backend.
#[derive(Debug, Clone, PartialEq)]
pub struct LlmResponse {
    /// Content blocks in the response (text and/or tool use).
    pub content: Vec<ContentBlock>,
    /// Why the model stopped generating.
    pub stop_reason: Option<StopReason>,
    /// Model identifier (if returned by the API).
    pub model: Option<String>,
}

impl LlmResponse {
    /// Create a text-only response.
    pub fn from_text(text: impl Into<String>) -> Self {
        Self {
            content: vec![ContentBlock::text(text)],
            stop_reason: Some(StopReason::EndTurn),
            model: None,
        }
    }

    /// Concatenate all `Text` content blocks into a single string.
    pub fn text_content(&self) -> String {
        self.content
            .iter()
            .filter_map(|b| b.as_text())
            .collect::<Vec<_>>()
            .join("")
    }

    /// Returns `true` if the response contains any tool use requests.
    pub fn has_tool_calls(&self) -> bool {
        self.content
            .iter()
            .any(|b| matches!(b, ContentBlock::ToolUse { .. }))
    }

    /// Resolve this response into the turn [`Outcome`].
    pub fn into_outcome(self, catalog: &ToolCatalog) -> Result<Outcome, DomainError> {
        if !self.has_tool_calls() {
            return Ok(Outcome::FinalAnswer(self.text_content()));
        }

        let mut calls: Vec<ToolCallRequest> = Vec::new();
        for block in self.content {
            let ContentBlock::ToolUse { id, name, input } = block else {
                continue;
            };

            if id.trim().is_empty() {
                return Err(DomainError::MalformedResponse(format!(
                    "tool call to '{}' has an empty id",
                    name
                )));
            }
            if !catalog.contains(&name) {
                return Err(DomainError::MalformedResponse(format!(
                    "model requested unknown tool '{}'",
                    name
                )));
            }
            if calls.iter().any(|c| c.id == id) {
                return Err(DomainError::MalformedResponse(format!(
                    "duplicate tool call id '{}'",
                    id
                )));
            }

            calls.push(ToolCallRequest::new(id, name).with_arguments(input));
        }

        Ok(Outcome::ToolCallsRequested(calls))
    }
}

/// What the model decided to do on one turn.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    FinalAnswer(String),
    /// Ordered, non-empty batch of calls to execute before the next turn
    ToolCallsRequested(Vec<ToolCallRequest>),
}
