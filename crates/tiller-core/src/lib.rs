//! Tiller Core Library
//!
//! Drives a language model through rounds of tool use until it produces a
//! final answer. The CLI is a thin presentation layer over this crate.
//!
//! - `agent` - the orchestrator loop, subagent spawning, loop events, hooks
//! - `ai` - conversation types and the model service seam
//! - `tools` - tool registry, workspace file access, built-in tools
//! - `plan` - the bounded single-focus task list
//! - `skills` - on-disk knowledge packets loaded on demand

pub mod agent;
pub mod ai;
pub mod paths;
pub mod plan;
pub mod skills;
pub mod tools;

pub use agent::{
    AgentError, AgentRole, AgenticOrchestrator, LoopEvent, LoopExit, LoopOutcome,
    OrchestratorConfig, OrchestratorServices,
};
pub use ai::{AiClientConfig, ModelService, OpenAiClient};
pub use skills::SkillCatalog;
pub use tools::{register_all_tools, ToolRegistry};
