//! Bounding prompts, tool output and upstream error bodies before they reach
//! a log line or an API error message.

/// Longest prefix of `s` that fits in `max_bytes` and ends on a char boundary.
pub fn truncate_str(s: &str, max_bytes: usize) -> &str {
    let end = s
        .char_indices()
        .map(|(start, c)| start + c.len_utf8())
        .take_while(|&end| end <= max_bytes)
        .last()
        .unwrap_or(0);
    &s[..end]
}

/// Single-line preview for log fields: newlines collapsed, `...` appended
/// when truncated.
pub fn preview(s: &str, max_bytes: usize) -> String {
    let flat = s.replace(['\n', '\r'], " ");
    let cut = truncate_str(&flat, max_bytes);
    if cut.len() < flat.len() {
        format!("{}...", cut)
    } else {
        flat
    }
}
