//! Agent system for Tiller
//!
//! ## Orchestrator (the agentic loop)
//! - `AgenticOrchestrator` - model request, tool dispatch, repeat until done
//! - `LoopEvent` - progress protocol between orchestrator and consumers
//! - `OrchestratorConfig` / `OrchestratorServices` - configuration and dependencies
//!
//! ## Hooks
//! - `LoggingHook` - logs every tool execution with timing
//!
//! ## Sub-agents
//! - `SubagentSpawner` - runs an isolated child orchestrator for one subtask
//! - `AgentRole` - explore / code / plan, each with its own tool access

pub mod context;
pub mod hooks;
pub mod loop_events;
pub mod orchestrator;
pub mod subagent;

use thiserror::Error;

use crate::ai::ModelError;

pub use context::{build_system_prompt, subagent_system_prompt};
pub use hooks::{LoggingHook, PostToolHook};
pub use loop_events::LoopEvent;
pub use orchestrator::{
    AgenticOrchestrator, LoopExit, LoopOutcome, OrchestratorConfig, OrchestratorServices,
};
pub use subagent::{AgentProgress, AgentRole, SubagentSpawner, ToolAccess};

/// Failure that ends an orchestrator run
#[derive(Debug, Error)]
pub enum AgentError {
    #[error("Model request failed: {0}")]
    Model(#[from] ModelError),
}
