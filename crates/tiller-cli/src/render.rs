//! Terminal rendering of loop events

use std::io::{self, Write};

use serde_json::Value;
use tokio::sync::mpsc;

use tiller_core::agent::subagent::AgentProgressStatus;
use tiller_core::LoopEvent;

const PREVIEW_CHARS: usize = 200;

/// Writes `LoopEvent`s as they arrive. Subagent progress is redrawn in place.
pub struct EventRenderer<W: Write> {
    out: W,
    echo_text: bool,
    progress_open: bool,
}

impl<W: Write> EventRenderer<W> {
    /// `echo_text` prints model text as it arrives (off in one-shot mode,
    /// which prints only the final answer)
    pub fn new(out: W, echo_text: bool) -> Self {
        Self {
            out,
            echo_text,
            progress_open: false,
        }
    }

    pub fn render(&mut self, event: &LoopEvent) -> io::Result<()> {
        match event {
            LoopEvent::AssistantText { text } if self.echo_text => {
                self.close_progress()?;
                writeln!(self.out, "{}", text)?;
            }
            LoopEvent::ToolExecuting {
                name, arguments, ..
            } => {
                self.close_progress()?;
                writeln!(self.out, "\n{}", tool_header(name, arguments))?;
            }
            LoopEvent::ToolResult {
                name,
                output,
                is_error,
                ..
            } => {
                if let Some(line) = result_line(name, output, *is_error) {
                    self.close_progress()?;
                    writeln!(self.out, "  {}", line)?;
                }
            }
            LoopEvent::SubagentProgress { progress } => {
                write!(self.out, "\r  {}", progress.status_line())?;
                self.progress_open = progress.status == AgentProgressStatus::Running;
                if !self.progress_open {
                    writeln!(self.out)?;
                }
            }
            LoopEvent::Cancelled => {
                self.close_progress()?;
                writeln!(self.out, "(interrupted)")?;
            }
            _ => {}
        }
        self.out.flush()
    }

    fn close_progress(&mut self) -> io::Result<()> {
        if self.progress_open {
            writeln!(self.out)?;
            self.progress_open = false;
        }
        Ok(())
    }

    #[cfg(test)]
    fn into_inner(self) -> W {
        self.out
    }
}

/// Drain `rx` into `renderer` until the sender side is dropped
pub async fn print_events<W: Write>(
    mut rx: mpsc::UnboundedReceiver<LoopEvent>,
    mut renderer: EventRenderer<W>,
) {
    while let Some(event) = rx.recv().await {
        if let Err(e) = renderer.render(&event) {
            tracing::debug!(error = %e, "Failed to render event");
        }
    }
}

/// `> tool: args` line announcing a call
pub fn tool_header(name: &str, arguments: &Value) -> String {
    let field = |key: &str, fallback: &'static str| {
        arguments
            .get(key)
            .and_then(Value::as_str)
            .unwrap_or(fallback)
            .to_string()
    };
    match name {
        "Task" => format!("> Task: {}", field("description", "subtask")),
        "Skill" => format!("> Loading skill: {}", field("skill", "?")),
        _ => format!("> {}: {}", name, arguments),
    }
}

/// Indented summary of a result; `Task` output is left to the final answer
pub fn result_line(name: &str, output: &str, is_error: bool) -> Option<String> {
    match name {
        "Task" if !is_error => None,
        "Skill" if !is_error => Some(format!("Skill loaded ({} chars)", output.chars().count())),
        _ => Some(preview(output)),
    }
}

fn preview(output: &str) -> String {
    match output.char_indices().nth(PREVIEW_CHARS) {
        Some((idx, _)) => format!("{}...", &output[..idx]),
        None => output.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use tiller_core::agent::AgentProgress;

    use super::*;

    #[test]
    fn headers_per_tool_kind() {
        assert_eq!(
            tool_header("Task", &json!({"description": "find auth"})),
            "> Task: find auth"
        );
        assert_eq!(
            tool_header("Skill", &json!({"skill": "pdf"})),
            "> Loading skill: pdf"
        );
        assert_eq!(
            tool_header("bash", &json!({"command": "ls"})),
            "> bash: {\"command\":\"ls\"}"
        );
    }

    #[test]
    fn result_previews_are_capped() {
        let long = "é".repeat(250);
        let line = result_line("read_file", &long, false).unwrap();
        assert_eq!(line, format!("{}...", "é".repeat(200)));
        assert_eq!(result_line("bash", "ok", false).as_deref(), Some("ok"));
    }

    #[test]
    fn skill_and_task_results_are_summarized() {
        assert_eq!(
            result_line("Skill", "abcd", false).as_deref(),
            Some("Skill loaded (4 chars)")
        );
        assert_eq!(result_line("Task", "summary", false), None);
        assert_eq!(
            result_line("Task", "Error: Unknown agent type 'x'", true).as_deref(),
            Some("Error: Unknown agent type 'x'")
        );
    }

    #[test]
    fn progress_redraws_in_place_until_done() {
        let mut renderer = EventRenderer::new(Vec::new(), true);
        let mut progress = AgentProgress {
            role: "explore".to_string(),
            description: "scan".to_string(),
            ..Default::default()
        };
        renderer
            .render(&LoopEvent::SubagentProgress {
                progress: progress.clone(),
            })
            .unwrap();
        progress.tool_count = 1;
        progress.elapsed_ms = 1500;
        progress.status = AgentProgressStatus::Complete;
        renderer
            .render(&LoopEvent::SubagentProgress { progress })
            .unwrap();

        let out = String::from_utf8(renderer.into_inner()).unwrap();
        assert_eq!(
            out,
            "\r  [explore] scan ... 0 tools, 0.0s\r  [explore] scan ... 1 tools, 1.5s - done\n"
        );
    }

    #[test]
    fn one_shot_mode_skips_streamed_text() {
        let mut renderer = EventRenderer::new(Vec::new(), false);
        renderer
            .render(&LoopEvent::AssistantText {
                text: "hello".to_string(),
            })
            .unwrap();
        assert!(renderer.into_inner().is_empty());
    }
}
