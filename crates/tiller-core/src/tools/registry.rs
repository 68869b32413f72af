//! Tool registry for managing available tools
//!
//! The tool set is closed: every tool has a `ToolName`. A registry may hold a
//! subset of them (role filtering); anything outside that subset is answered
//! as an unknown tool. Dispatch never fails: every error becomes text.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::Value;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::agent::hooks::PostToolHook;
use crate::agent::loop_events::LoopEvent;
use crate::agent::subagent::{SubagentSpawner, ToolAccess};
use crate::ai::types::AiTool;
use crate::plan::TaskPlanner;
use crate::skills::SkillCatalog;
use crate::tools::implementations::bash::DEFAULT_COMMAND_TIMEOUT;
use crate::tools::truncation::{truncate_head_chars, MAX_OUTPUT_CHARS};
use crate::tools::workspace::Workspace;

/// Every tool the system knows about
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ToolName {
    Bash,
    ReadFile,
    WriteFile,
    EditFile,
    TodoWrite,
    Task,
    Skill,
}

impl ToolName {
    pub const ALL: [ToolName; 7] = [
        ToolName::Bash,
        ToolName::ReadFile,
        ToolName::WriteFile,
        ToolName::EditFile,
        ToolName::TodoWrite,
        ToolName::Task,
        ToolName::Skill,
    ];

    /// Wire name used in declarations and calls
    pub fn as_str(self) -> &'static str {
        match self {
            ToolName::Bash => "bash",
            ToolName::ReadFile => "read_file",
            ToolName::WriteFile => "write_file",
            ToolName::EditFile => "edit_file",
            ToolName::TodoWrite => "TodoWrite",
            ToolName::Task => "Task",
            ToolName::Skill => "Skill",
        }
    }

    pub fn parse(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.as_str() == name)
    }
}

impl fmt::Display for ToolName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Tool execution result
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolResult {
    pub output: String,
    pub is_error: bool,
    pub truncated: bool,
}

impl ToolResult {
    /// Create a success result
    pub fn success(output: impl Into<String>) -> Self {
        Self {
            output: output.into(),
            is_error: false,
            truncated: false,
        }
    }

    /// Create an error result rendered as `Error: <msg>`
    pub fn error(msg: impl fmt::Display) -> Self {
        Self {
            output: format!("Error: {}", msg),
            is_error: true,
            truncated: false,
        }
    }

    /// Answer for a call naming a tool this registry does not expose
    pub fn unknown_tool(name: &str) -> Self {
        Self {
            output: format!("Unknown tool: {}", name),
            is_error: true,
            truncated: false,
        }
    }

    /// Apply the global output cap
    fn capped(self) -> Self {
        let result = truncate_head_chars(&self.output, MAX_OUTPUT_CHARS);
        Self {
            output: result.text,
            truncated: self.truncated || result.was_truncated,
            is_error: self.is_error,
        }
    }
}

/// Parse tool parameters, returning a ToolResult error on failure
pub fn parse_params<T: serde::de::DeserializeOwned>(params: Value) -> Result<T, ToolResult> {
    serde_json::from_value(params)
        .map_err(|e| ToolResult::error(format!("Invalid parameters: {}", e)))
}

/// Context for tool execution, built fresh for each orchestrator run
pub struct ToolContext {
    pub workspace: Arc<Workspace>,
    /// Default timeout for shell commands
    pub command_timeout: Duration,
    /// The running agent's own task list
    pub planner: Arc<Mutex<TaskPlanner>>,
    pub skills: Arc<SkillCatalog>,
    /// Present only for agents allowed to delegate
    pub spawner: Option<SubagentSpawner>,
    /// Nesting level of the running agent (0 = top level)
    pub depth: usize,
    pub cancellation: CancellationToken,
    /// Channel for progress events (subagent progress lines)
    pub event_tx: Option<mpsc::UnboundedSender<LoopEvent>>,
}

impl ToolContext {
    pub fn new(workspace: Arc<Workspace>) -> Self {
        Self {
            workspace,
            command_timeout: DEFAULT_COMMAND_TIMEOUT,
            planner: Arc::new(Mutex::new(TaskPlanner::new())),
            skills: Arc::new(SkillCatalog::empty()),
            spawner: None,
            depth: 0,
            cancellation: CancellationToken::new(),
            event_tx: None,
        }
    }

    pub fn with_command_timeout(mut self, timeout: Duration) -> Self {
        self.command_timeout = timeout;
        self
    }

    pub fn with_planner(mut self, planner: Arc<Mutex<TaskPlanner>>) -> Self {
        self.planner = planner;
        self
    }

    pub fn with_skills(mut self, skills: Arc<SkillCatalog>) -> Self {
        self.skills = skills;
        self
    }

    pub fn with_spawner(mut self, spawner: SubagentSpawner) -> Self {
        self.spawner = Some(spawner);
        self
    }

    pub fn with_depth(mut self, depth: usize) -> Self {
        self.depth = depth;
        self
    }

    pub fn with_cancellation(mut self, cancellation: CancellationToken) -> Self {
        self.cancellation = cancellation;
        self
    }

    pub fn with_event_tx(mut self, tx: mpsc::UnboundedSender<LoopEvent>) -> Self {
        self.event_tx = Some(tx);
        self
    }

    pub(crate) fn emit(&self, event: LoopEvent) {
        if let Some(tx) = &self.event_tx {
            let _ = tx.send(event);
        }
    }
}

/// Trait for tool implementations
#[async_trait]
pub trait Tool: Send + Sync {
    /// Tool name (id)
    fn name(&self) -> ToolName;

    /// Tool description for AI
    fn description(&self) -> &str;

    /// JSON schema for parameters
    fn parameters_schema(&self) -> Value;

    /// Execute the tool
    async fn execute(&self, params: Value, ctx: &ToolContext) -> ToolResult;
}

/// Registry mapping tool names to implementations, with post-execution hooks
#[derive(Clone, Default)]
pub struct ToolRegistry {
    tools: BTreeMap<ToolName, Arc<dyn Tool>>,
    post_hooks: Vec<Arc<dyn PostToolHook>>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a tool, replacing any previous one with the same name
    pub fn register(&mut self, tool: Arc<dyn Tool>) {
        self.tools.insert(tool.name(), tool);
    }

    /// Add a post-execution hook
    pub fn add_post_hook(&mut self, hook: Arc<dyn PostToolHook>) {
        self.post_hooks.push(hook);
    }

    pub fn contains(&self, name: ToolName) -> bool {
        self.tools.contains_key(&name)
    }

    /// Names of registered tools, in declaration order
    pub fn names(&self) -> Vec<ToolName> {
        self.tools.keys().copied().collect()
    }

    /// Registry exposing only what `access` allows. `Task` is never carried
    /// over, so a filtered registry cannot delegate.
    pub fn filtered(&self, access: &ToolAccess) -> ToolRegistry {
        ToolRegistry {
            tools: self
                .tools
                .iter()
                .filter(|(name, _)| **name != ToolName::Task && access.allows(**name))
                .map(|(name, tool)| (*name, Arc::clone(tool)))
                .collect(),
            post_hooks: self.post_hooks.clone(),
        }
    }

    /// Get all tools as AI tool definitions
    pub fn get_ai_tools(&self) -> Vec<AiTool> {
        self.tools
            .values()
            .map(|t| AiTool {
                name: t.name().to_string(),
                description: t.description().to_string(),
                input_schema: t.parameters_schema(),
            })
            .collect()
    }

    /// Execute a tool call by wire name
    pub async fn execute(&self, name: &str, params: Value, ctx: &ToolContext) -> ToolResult {
        let Some(tool) = ToolName::parse(name).and_then(|n| self.tools.get(&n)) else {
            tracing::info!(tool = name, "Call to unavailable tool");
            return ToolResult::unknown_tool(name);
        };

        if let Err(reason) = validate_arguments(&tool.parameters_schema(), &params) {
            tracing::info!(tool = name, reason = %reason, "Rejected tool arguments");
            return ToolResult::error(format!("Invalid arguments for {}: {}", name, reason));
        }

        let start = Instant::now();
        let result = tool.execute(params.clone(), ctx).await.capped();
        let duration = start.elapsed();

        for hook in &self.post_hooks {
            hook.after_execute(name, &params, &result, duration).await;
        }

        result
    }
}

/// Check `args` against a flat JSON schema: object shape, required fields,
/// primitive property types and `additionalProperties: false`.
pub fn validate_arguments(schema: &Value, args: &Value) -> Result<(), String> {
    let Some(obj) = args.as_object() else {
        return Err("arguments must be a JSON object".to_string());
    };

    if let Some(required) = schema.get("required").and_then(Value::as_array) {
        for field in required.iter().filter_map(Value::as_str) {
            if obj.get(field).map_or(true, Value::is_null) {
                return Err(format!("missing required field '{}'", field));
            }
        }
    }

    let properties = schema.get("properties").and_then(Value::as_object);
    let closed = schema.get("additionalProperties") == Some(&Value::Bool(false));

    for (key, value) in obj {
        let Some(property) = properties.and_then(|p| p.get(key)) else {
            if closed {
                return Err(format!("unknown field '{}'", key));
            }
            continue;
        };
        if value.is_null() {
            continue;
        }
        let Some(expected) = property.get("type").and_then(Value::as_str) else {
            continue;
        };
        let matches = match expected {
            "string" => value.is_string(),
            "integer" => value.is_i64() || value.is_u64(),
            "number" => value.is_number(),
            "boolean" => value.is_boolean(),
            "array" => value.is_array(),
            "object" => value.is_object(),
            _ => true,
        };
        if !matches {
            return Err(format!("field '{}' must be of type {}", key, expected));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::hooks::LoggingHook;
    use serde_json::json;

    struct EchoTool;

    #[async_trait]
    impl Tool for EchoTool {
        fn name(&self) -> ToolName {
            ToolName::ReadFile
        }

        fn description(&self) -> &str {
            "Echo"
        }

        fn parameters_schema(&self) -> Value {
            json!({
                "type": "object",
                "properties": {
                    "path": {"type": "string"},
                    "limit": {"type": "integer"}
                },
                "required": ["path"]
            })
        }

        async fn execute(&self, params: Value, _ctx: &ToolContext) -> ToolResult {
            let path = params["path"].as_str().unwrap_or_default();
            if path == "huge" {
                return ToolResult::success("y".repeat(MAX_OUTPUT_CHARS + 10));
            }
            ToolResult::success(path)
        }
    }

    fn context() -> (tempfile::TempDir, ToolContext) {
        let dir = tempfile::tempdir().unwrap();
        let ws = Arc::new(Workspace::new(dir.path()).unwrap());
        (dir, ToolContext::new(ws))
    }

    fn registry() -> ToolRegistry {
        let mut registry = ToolRegistry::new();
        registry.register(Arc::new(EchoTool));
        registry.add_post_hook(Arc::new(LoggingHook::new()));
        registry
    }

    #[test]
    fn tool_names_round_trip() {
        for name in ToolName::ALL {
            assert_eq!(ToolName::parse(name.as_str()), Some(name));
        }
        assert_eq!(ToolName::parse("read"), None);
    }

    #[tokio::test]
    async fn test_tool_registry_nonexistent_tool() {
        let (_dir, ctx) = context();
        let result = registry().execute("nonexistent_tool", json!({}), &ctx).await;
        assert!(result.is_error);
        assert_eq!(result.output, "Unknown tool: nonexistent_tool");
    }

    #[tokio::test]
    async fn known_name_outside_registry_is_unknown() {
        let (_dir, ctx) = context();
        let result = registry()
            .execute("write_file", json!({"path": "a", "content": "b"}), &ctx)
            .await;
        assert_eq!(result.output, "Unknown tool: write_file");
    }

    #[tokio::test]
    async fn invalid_arguments_become_error_text() {
        let (_dir, ctx) = context();
        let registry = registry();

        let missing = registry.execute("read_file", json!({}), &ctx).await;
        assert_eq!(
            missing.output,
            "Error: Invalid arguments for read_file: missing required field 'path'"
        );

        let wrong_type = registry
            .execute("read_file", json!({"path": "a", "limit": "ten"}), &ctx)
            .await;
        assert!(wrong_type.output.contains("field 'limit' must be of type integer"));

        let not_object = registry.execute("read_file", json!("raw"), &ctx).await;
        assert!(not_object.output.contains("arguments must be a JSON object"));
    }

    #[tokio::test]
    async fn output_is_capped_and_flagged() {
        let (_dir, ctx) = context();
        let result = registry()
            .execute("read_file", json!({"path": "huge"}), &ctx)
            .await;
        assert!(result.truncated);
        assert_eq!(result.output.chars().count(), MAX_OUTPUT_CHARS);
    }

    #[test]
    fn filtered_registry_never_keeps_task() {
        let mut registry = registry();
        registry.register(Arc::new(crate::tools::implementations::TaskTool::new()));
        assert!(registry.contains(ToolName::Task));

        let filtered = registry.filtered(&ToolAccess::All);
        assert!(!filtered.contains(ToolName::Task));
        assert!(filtered.contains(ToolName::ReadFile));

        let none = registry.filtered(&ToolAccess::Specific(vec![ToolName::Bash]));
        assert!(none.names().is_empty());
    }

    #[test]
    fn parse_params_reports_invalid_parameters() {
        #[derive(serde::Deserialize, Debug)]
        struct TestParams {
            #[serde(rename = "name")]
            _name: String,
        }

        let err = parse_params::<TestParams>(json!({"name": 123})).unwrap_err();
        assert!(err.is_error);
        assert!(err.output.starts_with("Error: Invalid parameters"));
    }

    #[test]
    fn declarations_follow_name_order() {
        let mut registry = ToolRegistry::new();
        registry.register(Arc::new(crate::tools::implementations::WriteTool));
        registry.register(Arc::new(crate::tools::implementations::BashTool));
        let names: Vec<_> = registry.get_ai_tools().into_iter().map(|t| t.name).collect();
        assert_eq!(names, vec!["bash", "write_file"]);
    }
}
