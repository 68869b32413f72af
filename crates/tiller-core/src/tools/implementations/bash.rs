//! Bash tool - run shell commands in the workspace

use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};
use thiserror::Error;
use tokio::process::Command;
use tokio::time::{sleep, timeout};

use crate::tools::command_guard;
use crate::tools::registry::{parse_params, Tool, ToolContext, ToolName, ToolResult};
use crate::tools::truncation::{truncate_head_chars, MAX_OUTPUT_CHARS};

/// Default timeout for tool-initiated commands
pub const DEFAULT_COMMAND_TIMEOUT: Duration = Duration::from_secs(60);
/// Upper bound for any configured or requested timeout
pub const MAX_COMMAND_TIMEOUT: Duration = Duration::from_secs(300);

#[derive(Debug, Error)]
pub enum CommandError {
    #[error("Dangerous command blocked")]
    Blocked,

    #[error("Command timed out ({0}s)")]
    TimedOut(u64),

    #[error("Failed to spawn command: {0}")]
    Spawn(#[source] std::io::Error),
}

/// Runs one shell command with blocklist, timeout and output cap
#[derive(Debug, Clone)]
pub struct CommandExecutor {
    working_dir: PathBuf,
    timeout: Duration,
}

impl CommandExecutor {
    pub fn new(working_dir: impl Into<PathBuf>, timeout: Duration) -> Self {
        Self {
            working_dir: working_dir.into(),
            timeout: clamp_timeout(timeout),
        }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Run `command`, returning stdout then stderr, trimmed and capped
    pub async fn run(&self, command: &str) -> Result<String, CommandError> {
        if let Some(reason) = command_guard::blocked_reason(command) {
            tracing::warn!(command = %command, reason = reason, "Blocked dangerous command");
            return Err(CommandError::Blocked);
        }

        let mut cmd = build_shell_command(command, &self.working_dir);
        cmd.stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        configure_process_group(&mut cmd);

        let child = cmd.spawn().map_err(CommandError::Spawn)?;
        let pid = child.id();

        let output = match timeout(self.timeout, child.wait_with_output()).await {
            Ok(Ok(output)) => output,
            Ok(Err(e)) => return Err(CommandError::Spawn(e)),
            Err(_) => {
                tracing::warn!(
                    command = %command,
                    timeout_secs = self.timeout.as_secs(),
                    "Command timed out"
                );
                if let Some(pid) = pid {
                    terminate_process_tree(pid).await;
                }
                return Err(CommandError::TimedOut(self.timeout.as_secs()));
            }
        };

        tracing::debug!(
            command = %command,
            exit_code = output.status.code(),
            "Command finished"
        );

        let mut combined = String::from_utf8_lossy(&output.stdout).into_owned();
        combined.push_str(&String::from_utf8_lossy(&output.stderr));
        let trimmed = combined.trim();
        if trimmed.is_empty() {
            return Ok("(no output)".to_string());
        }
        Ok(truncate_head_chars(trimmed, MAX_OUTPUT_CHARS).text)
    }
}

fn clamp_timeout(requested: Duration) -> Duration {
    requested.clamp(Duration::from_secs(1), MAX_COMMAND_TIMEOUT)
}

fn build_shell_command(command: &str, working_dir: &Path) -> Command {
    let mut cmd = if cfg!(windows) {
        let mut c = Command::new("cmd");
        c.arg("/C").arg(command);
        c
    } else {
        let mut c = Command::new("sh");
        c.arg("-c").arg(command);
        c
    };

    cmd.env("NO_COLOR", "1");
    cmd.current_dir(working_dir);
    cmd
}

fn configure_process_group(cmd: &mut Command) {
    #[cfg(unix)]
    {
        cmd.process_group(0);
    }
    #[cfg(not(unix))]
    {
        let _ = cmd;
    }
}

#[cfg(unix)]
async fn terminate_process_tree(pid: u32) {
    let pgid = format!("-{}", pid);

    let group_term_ok = std::process::Command::new("kill")
        .arg("-TERM")
        .arg(&pgid)
        .status()
        .map(|s| s.success())
        .unwrap_or(false);

    if !group_term_ok {
        let _ = std::process::Command::new("kill")
            .arg("-TERM")
            .arg(pid.to_string())
            .status();
    }

    sleep(Duration::from_millis(200)).await;

    let _ = std::process::Command::new("kill")
        .arg("-KILL")
        .arg(&pgid)
        .status();
}

#[cfg(windows)]
async fn terminate_process_tree(pid: u32) {
    let _ = std::process::Command::new("taskkill")
        .args(["/PID", &pid.to_string(), "/T", "/F"])
        .output();
}

pub struct BashTool;

#[derive(Deserialize)]
struct Params {
    command: String,
    #[serde(default)]
    timeout: Option<u64>,
}

#[async_trait]
impl Tool for BashTool {
    fn name(&self) -> ToolName {
        ToolName::Bash
    }

    fn description(&self) -> &str {
        "Run a shell command in the workspace. Output is stdout then stderr, capped at 50000 characters. \
         Use for ls, find, grep, git, build tools, running scripts. Privileged and destructive commands are blocked."
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "command": {
                    "type": "string",
                    "description": "The shell command to execute"
                },
                "timeout": {
                    "type": "integer",
                    "description": "Optional timeout in seconds (default 60, max 300)"
                }
            },
            "required": ["command"]
        })
    }

    async fn execute(&self, params: Value, ctx: &ToolContext) -> ToolResult {
        let params = match parse_params::<Params>(params) {
            Ok(p) => p,
            Err(e) => return e,
        };

        let timeout = params
            .timeout
            .map(Duration::from_secs)
            .unwrap_or(ctx.command_timeout);
        let executor = CommandExecutor::new(ctx.workspace.root(), timeout);

        tracing::info!(
            command = %params.command,
            timeout_secs = executor.timeout().as_secs(),
            "Executing bash command"
        );
        match executor.run(&params.command).await {
            Ok(output) => ToolResult::success(output),
            Err(e) => ToolResult::error(e),
        }
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    fn executor(dir: &Path) -> CommandExecutor {
        CommandExecutor::new(dir, DEFAULT_COMMAND_TIMEOUT)
    }

    #[tokio::test]
    async fn stdout_then_stderr_trimmed() {
        let dir = tempfile::tempdir().unwrap();
        let out = executor(dir.path())
            .run("echo err 1>&2; echo out")
            .await
            .unwrap();
        assert_eq!(out, "out\nerr");
    }

    #[tokio::test]
    async fn empty_output_placeholder() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(executor(dir.path()).run("true").await.unwrap(), "(no output)");
    }

    #[tokio::test]
    async fn runs_in_working_dir() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("marker.txt"), "").unwrap();
        let out = executor(dir.path()).run("ls").await.unwrap();
        assert_eq!(out, "marker.txt");
    }

    #[tokio::test]
    async fn output_capped_at_limit() {
        let dir = tempfile::tempdir().unwrap();
        let out = executor(dir.path())
            .run("yes a | head -n 30000")
            .await
            .unwrap();
        assert_eq!(out.chars().count(), MAX_OUTPUT_CHARS);
    }

    #[tokio::test]
    async fn blocked_command_never_runs() {
        let dir = tempfile::tempdir().unwrap();
        let marker = dir.path().join("ran");
        let err = executor(dir.path())
            .run(&format!("touch {} && sudo ls", marker.display()))
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Dangerous command blocked");
        assert!(!marker.exists());
    }

    #[tokio::test]
    async fn timeout_reports_seconds() {
        let dir = tempfile::tempdir().unwrap();
        let err = CommandExecutor::new(dir.path(), Duration::from_secs(1))
            .run("sleep 5")
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Command timed out (1s)");
    }

    #[test]
    fn timeout_is_clamped() {
        let exec = CommandExecutor::new("/tmp", Duration::from_secs(10_000));
        assert_eq!(exec.timeout(), MAX_COMMAND_TIMEOUT);
    }
}
