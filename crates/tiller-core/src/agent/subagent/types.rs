//! Sub-agent types and data structures

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Arguments of a `Task` call
#[derive(Debug, Clone, Deserialize)]
pub struct SubagentRequest {
    /// Short task name for progress display
    pub description: String,
    /// Full instructions for the subagent
    pub prompt: String,
    /// Role tag, checked against the role registry
    pub agent_type: String,
}

/// What the parent gets back from a subagent
#[derive(Debug, Clone)]
pub struct SubagentResult {
    pub summary: String,
    pub tool_count: usize,
    pub elapsed: Duration,
    pub success: bool,
}

/// Status of a sub-agent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AgentProgressStatus {
    #[default]
    Running,
    Complete,
    Failed,
}

/// Real-time progress update from a sub-agent
#[derive(Debug, Clone, Default, Serialize)]
pub struct AgentProgress {
    pub task_id: String,
    /// Role tag
    pub role: String,
    /// Short task name from the `Task` call
    pub description: String,
    pub status: AgentProgressStatus,
    /// Number of tool calls completed so far
    pub tool_count: usize,
    pub elapsed_ms: u64,
    /// Current action description (e.g., "read main.rs")
    pub current_action: Option<String>,
}

impl AgentProgress {
    /// `[role] description ... N tools, X.Xs`, with ` - done` once finished
    pub fn status_line(&self) -> String {
        let mut line = format!(
            "[{}] {} ... {} tools, {:.1}s",
            self.role,
            self.description,
            self.tool_count,
            self.elapsed_ms as f64 / 1000.0
        );
        match self.status {
            AgentProgressStatus::Running => {}
            AgentProgressStatus::Complete => line.push_str(" - done"),
            AgentProgressStatus::Failed => line.push_str(" - failed"),
        }
        line
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_line_format() {
        let mut progress = AgentProgress {
            role: "explore".to_string(),
            description: "find auth files".to_string(),
            tool_count: 5,
            elapsed_ms: 3200,
            ..Default::default()
        };
        assert_eq!(
            progress.status_line(),
            "[explore] find auth files ... 5 tools, 3.2s"
        );
        progress.status = AgentProgressStatus::Complete;
        assert!(progress.status_line().ends_with(" - done"));
    }
}
