//! Shared helpers for tool use cases.

use mcp_agent_domain::ToolCallRequest;

/// Extract a short preview string from tool call arguments.
///
/// Looks for well-known keys (`node_id`, `id`, `path`, `query`, `url`)
/// first, then falls back to the first string value found.
pub(crate) fn tool_args_preview(call: &ToolCallRequest) -> String {
    let keys = ["node_id", "id", "path", "query", "url"];
    for key in &keys {
        if let Some(serde_json::Value::String(s)) = call.arguments.get(*key) {
            return truncate_preview(s, 50);
        }
    }
    // Fallback: first string value
    for value in call.arguments.values() {
        if let Some(s) = value.as_str() {
            return truncate_preview(s, 50);
        }
    }
    String::new()
}

fn truncate_preview(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let truncated: String = s.chars().take(max_len.saturating_sub(1)).collect();
        format!("{}…", truncated)
    }
}
