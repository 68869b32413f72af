//! System prompts and planning reminders for the agentic loop.
//!
//! The top-level prompt carries the tier-1 skill listing and the subagent
//! roles; a subagent prompt carries only its role preamble.

use std::path::Path;

use crate::skills::SkillCatalog;

use super::subagent::AgentRole;

/// Prefixed to the first user message of a session when reminders are on
pub const INITIAL_REMINDER: &str = "<reminder>Important: before acting, use the TodoWrite tool to \
create a task plan, even for tasks that look simple.

Example:
TodoWrite(items=[
  {\"content\": \"List directory files\", \"status\": \"in_progress\", \"activeForm\": \"Listing directory files\"},
  {\"content\": \"Read key files\", \"status\": \"pending\", \"activeForm\": \"Reading key files\"},
  {\"content\": \"Summarize project structure\", \"status\": \"pending\", \"activeForm\": \"Summarizing project structure\"}
])

Plan first, then execute.</reminder>";

/// Appended to a tool-result turn after too many rounds without `TodoWrite`
pub const NAG_REMINDER: &str = "<reminder>10+ turns without todo update. Please update todos.</reminder>";

/// Rounds without a `TodoWrite` call tolerated before the nag reminder
pub const NAG_AFTER_ROUNDS: usize = 10;

/// System prompt for a top-level orchestrator rooted at `workspace`
pub fn build_system_prompt(workspace: &Path, skills: &SkillCatalog) -> String {
    format!(
        "You are a coding agent at {}.

Loop: plan -> act with tools -> report.

**Available skills** (use the Skill tool when a task matches):
{}

**Available subagents** (use the Task tool for subtasks needing focused exploration or implementation):
{}

Rules:
- Use the Skill tool immediately when a task matches a skill description
- Use Task for subtasks needing focused exploration or implementation
- Use TodoWrite to track multi-step work
- Prefer tools over prose. Act, don't just explain.
- When done, summarize what changed.",
        workspace.display(),
        skills.descriptions(),
        AgentRole::descriptions()
    )
}

/// System prompt for a subagent of `role` rooted at `workspace`
pub fn subagent_system_prompt(role: AgentRole, workspace: &Path) -> String {
    format!(
        "You are a {} subagent at {}.\n\n{}\n\nComplete the task and return a clear, concise summary.",
        role.as_str(),
        workspace.display(),
        role.preamble()
    )
}
