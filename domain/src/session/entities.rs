//! Session domain entities

use crate::tool::entities::ToolCallRequest;
use crate::tool::value_objects::ToolCallResult;
use serde::{Deserialize, Serialize};

/// Role of a message in a conversation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
    Tool,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::System => "system",
            Role::User => "user",
            Role::Assistant => "assistant",
            Role::Tool => "tool",
        }
    }
}

/// A message in a conversation (Entity)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    /// Text content; empty when an assistant message only carries tool calls
    pub content: String,
    /// Tool calls requested by the assistant, in model order
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tool_calls: Vec<ToolCallRequest>,
    /// For `Role::Tool`: the call this message answers
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_call_id: Option<String>,
    /// For `Role::Tool`: name of the tool that produced the content
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_name: Option<String>,
}

impl Message {
    fn plain(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
            tool_calls: Vec::new(),
            tool_call_id: None,
            tool_name: None,
        }
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self::plain(Role::System, content)
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::plain(Role::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::plain(Role::Assistant, content)
    }

    /// Assistant turn that requests tool calls instead of answering.
    pub fn assistant_tool_calls(calls: Vec<ToolCallRequest>) -> Self {
        Self {
            tool_calls: calls,
            ..Self::plain(Role::Assistant, "")
        }
    }

    /// Tool-role message carrying a result (output or error text).
    pub fn tool_result(result: &ToolCallResult) -> Self {
        Self {
            tool_call_id: Some(result.call_id.clone()),
            tool_name: Some(result.tool_name.clone()),
            ..Self::plain(Role::Tool, result.content_for_model())
        }
    }

    pub fn has_tool_calls(&self) -> bool {
        !self.tool_calls.is_empty()
    }
}

/// Ordered, append-only message history of one run.
///
/// The whole history is replayed to the model on every turn, so messages are
/// never edited or removed once pushed.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Conversation {
    messages: Vec<Message>,
}

impl Conversation {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a conversation with optional instructions and the user prompt.
    ///
    /// Blank instructions are treated as absent.
    pub fn seed(instructions: Option<&str>, prompt: impl Into<String>) -> Self {
        let mut conversation = Self::new();
        if let Some(instructions) = instructions
            && !instructions.trim().is_empty()
        {
            conversation.push(Message::system(instructions));
        }
        conversation.push(Message::user(prompt));
        conversation
    }

    pub fn push(&mut self, message: Message) {
        self.messages.push(message);
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Synthesize a call id for backends that do not assign one.
    ///
    /// Unique within a run because the conversation grows on every turn.
    pub fn next_call_id(&self, index: usize) -> String {
        format!("call_{}_{}", self.messages.len(), index)
    }

    /// Whether an earlier assistant turn already requested a call with `id`.
    pub fn has_call_id(&self, id: &str) -> bool {
        self.messages
            .iter()
            .flat_map(|m| &m.tool_calls)
            .any(|c| c.id == id)
    }

    /// Call ids requested by the latest assistant tool-call message that have
    /// no tool message answering them yet.
    pub fn unanswered_tool_calls(&self) -> Vec<&str> {
        let Some(position) = self
            .messages
            .iter()
            .rposition(|m| m.role == Role::Assistant && m.has_tool_calls())
        else {
            return Vec::new();
        };

        let answered: Vec<&str> = self.messages[position + 1..]
            .iter()
            .filter(|m| m.role == Role::Tool)
            .filter_map(|m| m.tool_call_id.as_deref())
            .collect();

        self.messages[position]
            .tool_calls
            .iter()
            .map(|c| c.id.as_str())
            .filter(|id| !answered.contains(id))
            .collect()
    }
}
