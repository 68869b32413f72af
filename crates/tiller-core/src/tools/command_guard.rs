//! Shell command blocklist
//!
//! Two layers: literal substrings that are always refused, then a
//! segment-by-segment look at the tokens of each pipeline/list element.

use once_cell::sync::Lazy;
use regex::Regex;

/// Substrings refused anywhere in a command
const BLOCKED_SUBSTRINGS: &[&str] = &["rm -rf /", "sudo", "shutdown", "reboot", "> /dev/"];

static FORK_BOMB_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r":\(\)\s*\{\s*:\s*\|\s*:\s*&\s*\}\s*;\s*:").unwrap());
static NETWORK_PIPE_TO_SHELL_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b(curl|wget)\b.*\|\s*(sh|bash|zsh)\b").unwrap());

/// Why `command` is refused, if it is
pub fn blocked_reason(command: &str) -> Option<&'static str> {
    if let Some(pattern) = BLOCKED_SUBSTRINGS.iter().copied().find(|p| command.contains(p)) {
        return Some(pattern);
    }
    if FORK_BOMB_PATTERN.is_match(command) {
        return Some("fork bomb");
    }
    if NETWORK_PIPE_TO_SHELL_PATTERN.is_match(command) {
        return Some("network script piped to shell");
    }

    split_shell_segments(command)
        .iter()
        .find_map(|segment| dangerous_segment_reason(segment))
}

fn split_shell_segments(command: &str) -> Vec<String> {
    let mut segments = Vec::new();
    let mut current = String::new();
    let mut in_single = false;
    let mut in_double = false;
    let mut escaped = false;
    let mut chars = command.chars().peekable();

    while let Some(ch) = chars.next() {
        if escaped {
            current.push(ch);
            escaped = false;
            continue;
        }

        match ch {
            '\\' if !in_single => {
                current.push(ch);
                escaped = true;
            }
            '\'' if !in_double => {
                in_single = !in_single;
                current.push(ch);
            }
            '"' if !in_single => {
                in_double = !in_double;
                current.push(ch);
            }
            ';' | '\n' if !in_single && !in_double => flush_segment(&mut segments, &mut current),
            '|' | '&' if !in_single && !in_double => {
                if chars.peek() == Some(&ch) {
                    chars.next();
                }
                flush_segment(&mut segments, &mut current);
            }
            _ => current.push(ch),
        }
    }

    flush_segment(&mut segments, &mut current);
    segments
}

fn flush_segment(segments: &mut Vec<String>, current: &mut String) {
    let trimmed = current.trim();
    if !trimmed.is_empty() {
        segments.push(trimmed.to_string());
    }
    current.clear();
}

fn tokenize_shell(segment: &str) -> Vec<String> {
    shell_words::split(segment)
        .unwrap_or_else(|_| segment.split_whitespace().map(ToString::to_string).collect())
}

fn is_env_assignment(token: &str) -> bool {
    let Some((key, _)) = token.split_once('=') else {
        return false;
    };
    !key.is_empty() && key.chars().all(|c| c == '_' || c.is_ascii_alphanumeric())
}

/// Drop leading `VAR=value` tokens and transparent wrappers like `env`
fn command_tokens(tokens: &[String]) -> &[String] {
    let mut idx = 0;
    while idx < tokens.len()
        && (is_env_assignment(&tokens[idx])
            || matches!(tokens[idx].as_str(), "env" | "command" | "exec" | "nohup"))
    {
        idx += 1;
    }
    &tokens[idx..]
}

fn is_dangerous_rm(tokens: &[String]) -> bool {
    let flags: Vec<&String> = tokens
        .iter()
        .skip(1)
        .filter(|t| t.starts_with('-'))
        .collect();
    let has_force = flags.iter().any(|t| t.contains('f') || *t == "--force");
    let has_recursive = flags.iter().any(|t| {
        (!t.starts_with("--") && (t.contains('r') || t.contains('R'))) || *t == "--recursive"
    });
    if !(has_force && has_recursive) {
        return false;
    }

    tokens
        .iter()
        .skip(1)
        .filter(|t| !t.starts_with('-'))
        .any(|target| {
            matches!(
                target.as_str(),
                "/" | "/*" | "~" | "~/" | "$HOME" | "$HOME/" | "${HOME}" | "${HOME}/"
            ) || ["/etc", "/usr", "/var", "/bin", "/boot", "/lib"]
                .iter()
                .any(|dir| target.starts_with(dir))
        })
}

fn dangerous_segment_reason(segment: &str) -> Option<&'static str> {
    let tokens = tokenize_shell(segment);
    let tokens = command_tokens(&tokens);
    let program = tokens.first()?;
    let command = program.rsplit('/').next().unwrap_or(program).to_ascii_lowercase();

    match command.as_str() {
        "sudo" | "doas" | "su" => Some("privilege escalation"),
        "shutdown" | "reboot" | "halt" | "poweroff" => Some("host power control"),
        "rm" if is_dangerous_rm(tokens) => Some("destructive rm target"),
        "dd" if tokens
            .iter()
            .skip(1)
            .any(|t| t.starts_with("of=/dev/") || t.starts_with("if=/dev/")) =>
        {
            Some("direct disk access with dd")
        }
        c if c.starts_with("mkfs") => Some("filesystem formatting command"),
        _ => None,
    }
}
