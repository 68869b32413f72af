//! TodoWrite tool - replace the running agent's task list

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::plan::MAX_TASKS;
use crate::tools::registry::{parse_params, Tool, ToolContext, ToolName, ToolResult};

pub struct TodoWriteTool;

#[derive(Deserialize)]
struct Params {
    items: Vec<Value>,
}

#[async_trait]
impl Tool for TodoWriteTool {
    fn name(&self) -> ToolName {
        ToolName::TodoWrite
    }

    fn description(&self) -> &str {
        "Update the task list. Send the complete list every time; it replaces the previous one. \
         Use it to plan multi-step work and track progress. At most one task may be in_progress."
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "items": {
                    "type": "array",
                    "description": format!("Complete task list (max {} items)", MAX_TASKS),
                    "items": {
                        "type": "object",
                        "properties": {
                            "content": {
                                "type": "string",
                                "description": "Task description"
                            },
                            "status": {
                                "type": "string",
                                "enum": ["pending", "in_progress", "completed"]
                            },
                            "activeForm": {
                                "type": "string",
                                "description": "Present-tense form shown while in progress, e.g. 'Running tests'"
                            }
                        },
                        "required": ["content", "status", "activeForm"]
                    }
                }
            },
            "required": ["items"]
        })
    }

    async fn execute(&self, params: Value, ctx: &ToolContext) -> ToolResult {
        let params = match parse_params::<Params>(params) {
            Ok(p) => p,
            Err(e) => return e,
        };

        let result = ctx.planner.lock().update(&params.items);
        match result {
            Ok(rendered) => ToolResult::success(rendered),
            Err(e) => ToolResult::error(e),
        }
    }
}
