//! Task tool - delegate a focused subtask to an isolated subagent

use async_trait::async_trait;
use serde_json::{json, Value};

use crate::agent::subagent::{AgentRole, SpawnError, SubagentRequest};
use crate::tools::registry::{parse_params, Tool, ToolContext, ToolName, ToolResult};

pub struct TaskTool {
    description: String,
}

impl TaskTool {
    pub fn new() -> Self {
        Self {
            description: format!(
                "Spawn a subagent for a focused subtask. Subagents run in isolated context - \
                 they cannot see the parent's history. Use this to keep the main conversation clean.\n\n\
                 Agent types:\n{}\n\n\
                 Examples:\n\
                 - Task(explore): \"Find all files using the auth module\"\n\
                 - Task(plan): \"Design a database migration strategy\"\n\
                 - Task(code): \"Implement the user registration form\"",
                AgentRole::descriptions()
            ),
        }
    }
}

impl Default for TaskTool {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Tool for TaskTool {
    fn name(&self) -> ToolName {
        ToolName::Task
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn parameters_schema(&self) -> Value {
        let roles: Vec<&str> = AgentRole::ALL.iter().map(|r| r.as_str()).collect();
        json!({
            "type": "object",
            "properties": {
                "description": {
                    "type": "string",
                    "description": "Short task name (3-5 words) for progress display"
                },
                "prompt": {
                    "type": "string",
                    "description": "Detailed instructions for the subagent"
                },
                "agent_type": {
                    "type": "string",
                    "enum": roles,
                    "description": "Which kind of subagent to run"
                }
            },
            "required": ["description", "prompt", "agent_type"]
        })
    }

    async fn execute(&self, params: Value, ctx: &ToolContext) -> ToolResult {
        let request = match parse_params::<SubagentRequest>(params) {
            Ok(r) => r,
            Err(e) => return e,
        };

        let Some(spawner) = &ctx.spawner else {
            return ToolResult::error(SpawnError::DepthExceeded(ctx.depth));
        };

        match spawner.spawn(request, ctx).await {
            Ok(result) => ToolResult {
                output: result.summary,
                is_error: !result.success,
                truncated: false,
            },
            Err(e) => ToolResult::error(e),
        }
    }
}
