//! Write tool - create or overwrite files

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::tools::registry::{parse_params, Tool, ToolContext, ToolName, ToolResult};

pub struct WriteTool;

#[derive(Deserialize)]
struct Params {
    path: String,
    content: String,
}

#[async_trait]
impl Tool for WriteTool {
    fn name(&self) -> ToolName {
        ToolName::WriteFile
    }

    fn description(&self) -> &str {
        "Write content to a file in the workspace, replacing it entirely. Parent directories are created as needed."
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "path": {
                    "type": "string",
                    "description": "Path relative to the workspace root"
                },
                "content": {
                    "type": "string",
                    "description": "Full file content"
                }
            },
            "required": ["path", "content"]
        })
    }

    async fn execute(&self, params: Value, ctx: &ToolContext) -> ToolResult {
        let params = match parse_params::<Params>(params) {
            Ok(p) => p,
            Err(e) => return e,
        };

        match ctx.workspace.write(&params.path, &params.content).await {
            Ok(msg) => ToolResult::success(msg),
            Err(e) => ToolResult::error(e),
        }
    }
}
