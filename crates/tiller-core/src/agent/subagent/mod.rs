//! Subagents: isolated child orchestrators for focused subtasks
//!
//! A subagent starts from a fresh history holding only its prompt, runs with
//! a role-specific system prompt and a filtered tool registry, and hands back
//! nothing but its final text.

mod roles;
mod spawner;
mod types;

pub use roles::{AgentRole, ToolAccess};
pub use spawner::{SpawnError, SubagentSpawner, MAX_SUBAGENT_DEPTH};
pub use types::{AgentProgress, AgentProgressStatus, SubagentRequest, SubagentResult};
