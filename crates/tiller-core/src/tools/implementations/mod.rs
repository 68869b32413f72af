//! Tool implementations
//!
//! - bash: run shell commands (blocklist, timeout, output cap)
//! - read_file / write_file / edit_file: workspace-confined file access
//! - TodoWrite: replace the agent's task list
//! - Skill: load a skill's full instructions on demand
//! - Task: delegate to an isolated subagent

pub mod bash;
pub mod edit;
pub mod read;
pub mod skill;
pub mod task;
pub mod todo_write;
pub mod write;

pub use bash::{BashTool, CommandExecutor};
pub use edit::EditTool;
pub use read::ReadTool;
pub use skill::SkillTool;
pub use task::TaskTool;
pub use todo_write::TodoWriteTool;
pub use write::WriteTool;

use std::sync::Arc;

use crate::agent::hooks::LoggingHook;
use crate::skills::SkillCatalog;
use crate::tools::registry::ToolRegistry;

/// Register every built-in tool plus the logging hook
pub fn register_all_tools(registry: &mut ToolRegistry, skills: &SkillCatalog) {
    registry.register(Arc::new(BashTool));
    registry.register(Arc::new(ReadTool));
    registry.register(Arc::new(WriteTool));
    registry.register(Arc::new(EditTool));
    registry.register(Arc::new(TodoWriteTool));
    registry.register(Arc::new(TaskTool::new()));
    registry.register(Arc::new(SkillTool::new(skills)));
    registry.add_post_hook(Arc::new(LoggingHook::new()));
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::tools::registry::ToolContext;
    use crate::tools::workspace::Workspace;

    fn setup() -> (tempfile::TempDir, ToolRegistry, ToolContext) {
        let dir = tempfile::tempdir().unwrap();
        let ws = Arc::new(Workspace::new(dir.path()).unwrap());
        let mut registry = ToolRegistry::new();
        register_all_tools(&mut registry, &SkillCatalog::empty());
        (dir, registry, ToolContext::new(ws))
    }

    #[test]
    fn registers_every_tool() {
        let (_dir, registry, _ctx) = setup();
        assert_eq!(registry.names(), crate::tools::ToolName::ALL.to_vec());
    }

    #[tokio::test]
    async fn file_tools_round_trip_through_registry() {
        let (_dir, registry, ctx) = setup();

        let wrote = registry
            .execute("write_file", json!({"path": "src/lib.rs", "content": "fn a() {}\n"}), &ctx)
            .await;
        assert_eq!(wrote.output, "Wrote 10 bytes to src/lib.rs");

        let edited = registry
            .execute(
                "edit_file",
                json!({"path": "src/lib.rs", "old_text": "fn a", "new_text": "fn b"}),
                &ctx,
            )
            .await;
        assert_eq!(edited.output, "Edited src/lib.rs");

        let read = registry
            .execute("read_file", json!({"path": "src/lib.rs"}), &ctx)
            .await;
        assert_eq!(read.output, "fn b() {}\n");
    }

    #[tokio::test]
    async fn escaping_paths_are_errors_not_failures() {
        let (dir, registry, ctx) = setup();

        for (name, args) in [
            ("read_file", json!({"path": "../../etc/passwd"})),
            ("write_file", json!({"path": "../escape.txt", "content": "x"})),
            ("edit_file", json!({"path": "/etc/hosts", "old_text": "a", "new_text": "b"})),
        ] {
            let result = registry.execute(name, args, &ctx).await;
            assert!(result.is_error, "{name} should fail");
            assert!(result.output.starts_with("Error: Path escapes workspace: "));
        }
        assert!(!dir.path().parent().unwrap().join("escape.txt").exists());
    }

    #[tokio::test]
    async fn todo_write_rejects_and_keeps_previous_list() {
        let (_dir, registry, ctx) = setup();
        let good = json!({"items": [{"content": "a", "status": "pending", "activeForm": "Doing a"}]});
        let bad = json!({"items": [
            {"content": "a", "status": "in_progress", "activeForm": "Doing a"},
            {"content": "b", "status": "in_progress", "activeForm": "Doing b"}
        ]});

        assert!(!registry.execute("TodoWrite", good, &ctx).await.is_error);
        let rejected = registry.execute("TodoWrite", bad, &ctx).await;
        assert_eq!(
            rejected.output,
            "Error: Only one task can be in_progress at a time (got 2)"
        );
        assert_eq!(ctx.planner.lock().render(), "[ ] a\n\n(0/1 completed)");
    }

    #[tokio::test]
    async fn unknown_skill_lists_available() {
        let (_dir, registry, ctx) = setup();
        let result = registry
            .execute("Skill", json!({"skill": "pdf"}), &ctx)
            .await;
        assert_eq!(result.output, "Error: Unknown skill 'pdf'. Available: none");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn blocked_bash_command_is_error_text() {
        let (_dir, registry, ctx) = setup();
        let result = registry
            .execute("bash", json!({"command": "sudo rm -rf /"}), &ctx)
            .await;
        assert!(result.is_error);
        assert_eq!(result.output, "Error: Dangerous command blocked");
    }
}
