//! Subagent spawning
//!
//! A spawn builds a brand-new orchestrator: fresh history seeded with the
//! prompt, role system prompt, fresh task list, role-filtered registry,
//! depth + 1 and a child cancellation token. Only the final text escapes.

use std::sync::Arc;
use std::time::{Duration, Instant};

use serde_json::Value;
use thiserror::Error;
use tokio::sync::mpsc;

use crate::agent::context::subagent_system_prompt;
use crate::agent::loop_events::LoopEvent;
use crate::agent::orchestrator::{
    AgenticOrchestrator, LoopExit, OrchestratorConfig, OrchestratorServices,
};
use crate::ai::client::ModelService;
use crate::ai::types::ModelMessage;
use crate::skills::SkillCatalog;
use crate::tools::registry::{ToolContext, ToolRegistry};
use crate::tools::workspace::Workspace;

use super::roles::AgentRole;
use super::types::{AgentProgress, AgentProgressStatus, SubagentRequest, SubagentResult};

/// Deepest nesting level that may still spawn is `MAX_SUBAGENT_DEPTH - 1`
pub const MAX_SUBAGENT_DEPTH: usize = 1;

const ACTION_PREVIEW_CHARS: usize = 40;

#[derive(Debug, Error)]
pub enum SpawnError {
    #[error("Unknown agent type '{0}'")]
    UnknownRole(String),

    #[error("Subagents cannot spawn subagents (depth {0})")]
    DepthExceeded(usize),
}

/// Builds and runs child orchestrators on behalf of the `Task` tool
#[derive(Clone)]
pub struct SubagentSpawner {
    model: Arc<dyn ModelService>,
    tools: Arc<ToolRegistry>,
    skills: Arc<SkillCatalog>,
    workspace: Arc<Workspace>,
    command_timeout: Duration,
}

impl SubagentSpawner {
    /// `tools` is the parent's full registry; each spawn filters it by role
    pub fn new(
        model: Arc<dyn ModelService>,
        tools: Arc<ToolRegistry>,
        skills: Arc<SkillCatalog>,
        workspace: Arc<Workspace>,
        command_timeout: Duration,
    ) -> Self {
        Self {
            model,
            tools,
            skills,
            workspace,
            command_timeout,
        }
    }

    /// Run one subagent to completion. Failures inside the child are
    /// reported in the summary, never as `Err`.
    pub async fn spawn(
        &self,
        request: SubagentRequest,
        parent: &ToolContext,
    ) -> Result<SubagentResult, SpawnError> {
        let role = AgentRole::parse(&request.agent_type)
            .ok_or_else(|| SpawnError::UnknownRole(request.agent_type.clone()))?;
        if parent.depth >= MAX_SUBAGENT_DEPTH {
            return Err(SpawnError::DepthExceeded(parent.depth));
        }

        let task_id = uuid::Uuid::new_v4().to_string();
        let depth = parent.depth + 1;
        tracing::info!(
            task_id = %task_id,
            role = role.as_str(),
            description = %request.description,
            depth,
            "Spawning subagent"
        );

        let services = OrchestratorServices {
            model: Arc::clone(&self.model),
            tool_registry: Arc::new(self.tools.filtered(&role.tool_access())),
            skills: Arc::clone(&self.skills),
        };
        let config = OrchestratorConfig {
            workspace: Arc::clone(&self.workspace),
            system_prompt: subagent_system_prompt(role, self.workspace.root()),
            depth,
            command_timeout: self.command_timeout,
            planning_reminders: false,
        };
        let mut child = AgenticOrchestrator::new(services, config);
        let mut history = vec![ModelMessage::user_text(request.prompt)];
        let cancel = parent.cancellation.child_token();

        let mut progress = AgentProgress {
            task_id: task_id.clone(),
            role: role.as_str().to_string(),
            description: request.description,
            ..Default::default()
        };
        parent.emit(LoopEvent::SubagentProgress {
            progress: progress.clone(),
        });

        let start = Instant::now();
        let (tx, mut rx) = mpsc::unbounded_channel();
        let run = child.run(&mut history, Some(tx), cancel);
        let forward = async move {
            while let Some(event) = rx.recv().await {
                match event {
                    LoopEvent::ToolExecuting {
                        name, arguments, ..
                    } => progress.current_action = Some(format_action(&name, &arguments)),
                    LoopEvent::ToolResult { .. } => progress.tool_count += 1,
                    _ => continue,
                }
                progress.elapsed_ms = start.elapsed().as_millis() as u64;
                parent.emit(LoopEvent::SubagentProgress {
                    progress: progress.clone(),
                });
            }
            progress
        };
        let (outcome, mut progress) = tokio::join!(run, forward);
        let elapsed = start.elapsed();

        let (summary, success) = match outcome {
            Ok(outcome) if outcome.exit == LoopExit::Cancelled => {
                ("(subagent cancelled)".to_string(), false)
            }
            Ok(outcome) if outcome.text.trim().is_empty() => {
                ("(subagent returned no text)".to_string(), true)
            }
            Ok(outcome) => (outcome.text, true),
            Err(e) => {
                tracing::warn!(task_id = %task_id, error = %e, "Subagent failed");
                (format!("Error: Subagent failed: {}", e), false)
            }
        };

        progress.status = if success {
            AgentProgressStatus::Complete
        } else {
            AgentProgressStatus::Failed
        };
        progress.elapsed_ms = elapsed.as_millis() as u64;
        progress.current_action = None;
        parent.emit(LoopEvent::SubagentProgress {
            progress: progress.clone(),
        });

        tracing::info!(
            task_id = %task_id,
            tool_count = progress.tool_count,
            elapsed_ms = progress.elapsed_ms,
            success,
            "Subagent finished"
        );

        Ok(SubagentResult {
            summary,
            tool_count: progress.tool_count,
            elapsed,
            success,
        })
    }
}

/// Short description of a tool call for progress display
pub fn format_action(name: &str, arguments: &Value) -> String {
    let detail = ["command", "path", "skill"]
        .iter()
        .find_map(|key| arguments.get(*key).and_then(Value::as_str));
    match detail {
        Some(detail) => {
            let preview: String = detail.chars().take(ACTION_PREVIEW_CHARS).collect();
            if detail.chars().count() > ACTION_PREVIEW_CHARS {
                format!("{} {}...", name, preview)
            } else {
                format!("{} {}", name, preview)
            }
        }
        None => name.to_string(),
    }
}
