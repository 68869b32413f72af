//! Agentic orchestrator: the single agent loop.
//!
//! `AgenticOrchestrator` drives one agent, top-level or subagent:
//! request a completion, dispatch every tool call in order, commit the
//! assistant turn plus one tool-result turn, and repeat until the model
//! answers without tool calls or the caller cancels.
//!
//! ```text
//!  ┌──────────────┐        LoopEvent         ┌─────────────┐
//!  │ Orchestrator │ ───────────────────────► │  Consumer   │
//!  │   (core)     │                          │   (CLI)     │
//!  └──────────────┘                          └─────────────┘
//! ```

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::ai::client::{ModelRequest, ModelService};
use crate::ai::types::{AiToolCall, Content, ModelMessage, Role};
use crate::plan::TaskPlanner;
use crate::skills::SkillCatalog;
use crate::tools::implementations::bash::DEFAULT_COMMAND_TIMEOUT;
use crate::tools::registry::{ToolContext, ToolName, ToolRegistry};
use crate::tools::workspace::Workspace;

use super::context::{INITIAL_REMINDER, NAG_AFTER_ROUNDS, NAG_REMINDER};
use super::loop_events::LoopEvent;
use super::subagent::{SubagentSpawner, MAX_SUBAGENT_DEPTH};
use super::AgentError;

/// Result text for calls of a batch that was cancelled before they ran
pub const INTERRUPTED_RESULT: &str = "Error: Interrupted by user before execution";

/// Configuration for an orchestrator.
pub struct OrchestratorConfig {
    pub workspace: Arc<Workspace>,
    pub system_prompt: String,
    /// Nesting level (0 = top level)
    pub depth: usize,
    /// Default timeout for shell commands
    pub command_timeout: Duration,
    /// Inject the initial and nag `TodoWrite` reminders
    pub planning_reminders: bool,
}

impl OrchestratorConfig {
    pub fn new(workspace: Arc<Workspace>, system_prompt: impl Into<String>) -> Self {
        Self {
            workspace,
            system_prompt: system_prompt.into(),
            depth: 0,
            command_timeout: DEFAULT_COMMAND_TIMEOUT,
            planning_reminders: false,
        }
    }
}

/// Shared services the orchestrator needs.
#[derive(Clone)]
pub struct OrchestratorServices {
    pub model: Arc<dyn ModelService>,
    pub tool_registry: Arc<ToolRegistry>,
    pub skills: Arc<SkillCatalog>,
}

/// How a run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopExit {
    /// The model answered without tool calls
    Completed,
    /// The caller cancelled the run
    Cancelled,
}

#[derive(Debug, Clone)]
pub struct LoopOutcome {
    pub exit: LoopExit,
    /// Final response text (empty when cancelled)
    pub text: String,
    /// Tool calls dispatched during this run
    pub tool_calls: usize,
    /// Model requests whose response was committed
    pub turns: usize,
}

/// The agentic orchestrator. Owns its task list, which persists across
/// runs of the same orchestrator.
pub struct AgenticOrchestrator {
    services: OrchestratorServices,
    config: OrchestratorConfig,
    planner: Arc<Mutex<TaskPlanner>>,
    rounds_without_todo: usize,
    reminded: bool,
}

impl AgenticOrchestrator {
    pub fn new(services: OrchestratorServices, config: OrchestratorConfig) -> Self {
        Self {
            services,
            config,
            planner: Arc::new(Mutex::new(TaskPlanner::new())),
            rounds_without_todo: 0,
            reminded: false,
        }
    }

    pub fn planner(&self) -> Arc<Mutex<TaskPlanner>> {
        Arc::clone(&self.planner)
    }

    /// Run the loop on `history` until the model stops calling tools.
    ///
    /// `history` must end with the user turn to answer. Every committed
    /// cycle leaves it with each tool call answered exactly once. On a model
    /// error the history holds whatever cycles completed before it.
    pub async fn run(
        &mut self,
        history: &mut Vec<ModelMessage>,
        event_tx: Option<mpsc::UnboundedSender<LoopEvent>>,
        cancel: CancellationToken,
    ) -> Result<LoopOutcome, AgentError> {
        self.apply_initial_reminder(history);

        let ctx = self.tool_context(event_tx.clone(), cancel.clone());
        let tools = self.services.tool_registry.get_ai_tools();
        let emit = |event: LoopEvent| {
            if let Some(tx) = &event_tx {
                let _ = tx.send(event);
            }
        };

        let mut turn = 0usize;
        let mut dispatched = 0usize;

        loop {
            if cancel.is_cancelled() {
                emit(LoopEvent::Cancelled);
                return Ok(LoopOutcome::cancelled(turn, dispatched));
            }

            let request = ModelRequest {
                system_prompt: &self.config.system_prompt,
                messages: history.as_slice(),
                tools: &tools,
            };
            let response = tokio::select! {
                biased;
                _ = cancel.cancelled() => None,
                response = self.services.model.complete(request) => Some(response?),
            };
            let Some(response) = response else {
                tracing::info!(depth = self.config.depth, turn, "Cancelled while awaiting model");
                emit(LoopEvent::Cancelled);
                return Ok(LoopOutcome::cancelled(turn, dispatched));
            };
            turn += 1;

            if !response.text.is_empty() {
                emit(LoopEvent::AssistantText {
                    text: response.text.clone(),
                });
            }

            let assistant = build_assistant_message(&response.text, &response.tool_calls);

            if !response.has_tool_calls() {
                history.push(assistant);
                tracing::info!(
                    depth = self.config.depth,
                    turns = turn,
                    tool_calls = dispatched,
                    "Agent loop finished"
                );
                emit(LoopEvent::Finished {
                    text: response.text.clone(),
                });
                return Ok(LoopOutcome {
                    exit: LoopExit::Completed,
                    text: response.text,
                    tool_calls: dispatched,
                    turns: turn,
                });
            }

            let mut results = Vec::with_capacity(response.tool_calls.len() + 1);
            let mut interrupted = false;

            for call in &response.tool_calls {
                if interrupted || cancel.is_cancelled() {
                    interrupted = true;
                    results.push(Content::ToolResult {
                        tool_use_id: call.id.clone(),
                        output: INTERRUPTED_RESULT.to_string(),
                        is_error: true,
                        truncated: false,
                    });
                    continue;
                }

                emit(LoopEvent::ToolExecuting {
                    id: call.id.clone(),
                    name: call.name.clone(),
                    arguments: call.arguments.clone(),
                });
                let result = self
                    .services
                    .tool_registry
                    .execute(&call.name, call.arguments.clone(), &ctx)
                    .await;
                dispatched += 1;
                emit(LoopEvent::ToolResult {
                    id: call.id.clone(),
                    name: call.name.clone(),
                    output: result.output.clone(),
                    is_error: result.is_error,
                });

                results.push(Content::ToolResult {
                    tool_use_id: call.id.clone(),
                    output: result.output,
                    is_error: result.is_error,
                    truncated: result.truncated,
                });
            }

            if let Some(nag) = self.track_todo_usage(&response.tool_calls) {
                results.push(Content::Text {
                    text: nag.to_string(),
                });
            }

            history.push(assistant);
            history.push(ModelMessage {
                role: Role::Tool,
                content: results,
            });
            emit(LoopEvent::TurnComplete { turn });

            if interrupted {
                tracing::info!(depth = self.config.depth, turn, "Cancelled during tool batch");
                emit(LoopEvent::Cancelled);
                return Ok(LoopOutcome::cancelled(turn, dispatched));
            }
        }
    }

    fn tool_context(
        &self,
        event_tx: Option<mpsc::UnboundedSender<LoopEvent>>,
        cancel: CancellationToken,
    ) -> ToolContext {
        let mut ctx = ToolContext::new(Arc::clone(&self.config.workspace))
            .with_command_timeout(self.config.command_timeout)
            .with_planner(Arc::clone(&self.planner))
            .with_skills(Arc::clone(&self.services.skills))
            .with_depth(self.config.depth)
            .with_cancellation(cancel);

        if let Some(tx) = event_tx {
            ctx = ctx.with_event_tx(tx);
        }

        if self.config.depth < MAX_SUBAGENT_DEPTH
            && self.services.tool_registry.contains(ToolName::Task)
        {
            ctx = ctx.with_spawner(SubagentSpawner::new(
                Arc::clone(&self.services.model),
                Arc::clone(&self.services.tool_registry),
                Arc::clone(&self.services.skills),
                Arc::clone(&self.config.workspace),
                self.config.command_timeout,
            ));
        }
        ctx
    }

    /// Prefix the first user message of the session with the planning reminder
    fn apply_initial_reminder(&mut self, history: &mut [ModelMessage]) {
        if !self.config.planning_reminders || self.reminded {
            return;
        }
        if let Some(message) = history.iter_mut().rev().find(|m| m.role == Role::User) {
            message.content.insert(
                0,
                Content::Text {
                    text: INITIAL_REMINDER.to_string(),
                },
            );
            self.reminded = true;
        }
    }

    /// Count rounds without `TodoWrite`; returns the nag text once overdue
    fn track_todo_usage(&mut self, calls: &[AiToolCall]) -> Option<&'static str> {
        if !self.config.planning_reminders {
            return None;
        }
        if calls.iter().any(|c| c.name == ToolName::TodoWrite.as_str()) {
            self.rounds_without_todo = 0;
            return None;
        }
        self.rounds_without_todo += 1;
        (self.rounds_without_todo > NAG_AFTER_ROUNDS).then_some(NAG_REMINDER)
    }
}

impl LoopOutcome {
    fn cancelled(turns: usize, tool_calls: usize) -> Self {
        Self {
            exit: LoopExit::Cancelled,
            text: String::new(),
            tool_calls,
            turns,
        }
    }
}

fn build_assistant_message(text: &str, tool_calls: &[AiToolCall]) -> ModelMessage {
    let mut content = Vec::with_capacity(tool_calls.len() + usize::from(!text.is_empty()));

    if !text.is_empty() {
        content.push(Content::Text {
            text: text.to_string(),
        });
    }

    for call in tool_calls {
        content.push(Content::ToolUse {
            id: call.id.clone(),
            name: call.name.clone(),
            input: call.arguments.clone(),
        });
    }

    ModelMessage {
        role: Role::Assistant,
        content,
    }
}
