//! Read tool - read text files from the workspace

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::tools::registry::{parse_params, Tool, ToolContext, ToolName, ToolResult};

pub struct ReadTool;

#[derive(Deserialize)]
struct Params {
    path: String,
    #[serde(default)]
    limit: Option<usize>,
}

#[async_trait]
impl Tool for ReadTool {
    fn name(&self) -> ToolName {
        ToolName::ReadFile
    }

    fn description(&self) -> &str {
        "Read the contents of a text file in the workspace. Use limit to read only the first N lines of large files."
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "path": {
                    "type": "string",
                    "description": "Path relative to the workspace root"
                },
                "limit": {
                    "type": "integer",
                    "description": "Maximum number of lines to read"
                }
            },
            "required": ["path"]
        })
    }

    async fn execute(&self, params: Value, ctx: &ToolContext) -> ToolResult {
        let params = match parse_params::<Params>(params) {
            Ok(p) => p,
            Err(e) => return e,
        };

        match ctx.workspace.read(&params.path, params.limit).await {
            Ok(content) => ToolResult::success(content),
            Err(e) => ToolResult::error(e),
        }
    }
}
