//! Output truncation utilities for tool results
//!
//! Limits are counted in characters, never split inside a UTF-8 sequence.

/// Hard cap on any text handed back to the model
pub const MAX_OUTPUT_CHARS: usize = 50_000;

/// Result of a truncation operation
#[derive(Debug, PartialEq, Eq)]
pub struct TruncationResult {
    pub text: String,
    pub was_truncated: bool,
}

/// Keep the first `max_chars` characters, dropping the rest.
pub fn truncate_head_chars(text: &str, max_chars: usize) -> TruncationResult {
    match text.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => TruncationResult {
            text: text[..byte_idx].to_string(),
            was_truncated: true,
        },
        None => TruncationResult {
            text: text.to_string(),
            was_truncated: false,
        },
    }
}

/// Keep the first `max_lines` lines, noting how many were left out.
pub fn truncate_head_lines(text: &str, max_lines: usize) -> TruncationResult {
    let lines: Vec<&str> = text.lines().collect();
    if lines.len() <= max_lines {
        return TruncationResult {
            text: text.to_string(),
            was_truncated: false,
        };
    }

    let mut kept = lines[..max_lines].join("\n");
    kept.push_str(&format!("\n... ({} more lines)", lines.len() - max_lines));
    TruncationResult {
        text: kept,
        was_truncated: true,
    }
}
