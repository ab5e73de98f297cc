//! Escaping of text injected into generated instructions.
//!
//! Keeps description and user text well-formed inside the instruction
//! preamble. This is not a prompt-injection defence.

/// Escapes backslashes, quotes, carriage returns and tabs; drops newlines.
pub fn escape_for_prompt(input: &str) -> String {
    let mut out = String::with_capacity(input.len() + input.len() / 8);
    for c in input.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\'' => out.push_str("\\'"),
            '\n' => {}
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            other => out.push(other),
        }
    }
    out
}
