//! Edit tool - exact text replacement in a file

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::tools::registry::{parse_params, Tool, ToolContext, ToolName, ToolResult};

pub struct EditTool;

#[derive(Deserialize)]
struct Params {
    path: String,
    old_text: String,
    new_text: String,
}

#[async_trait]
impl Tool for EditTool {
    fn name(&self) -> ToolName {
        ToolName::EditFile
    }

    fn description(&self) -> &str {
        "Replace exact text in a file. old_text must appear verbatim; only the first occurrence is replaced."
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "path": {
                    "type": "string",
                    "description": "Path relative to the workspace root"
                },
                "old_text": {
                    "type": "string",
                    "description": "Exact text to find"
                },
                "new_text": {
                    "type": "string",
                    "description": "Replacement text"
                }
            },
            "required": ["path", "old_text", "new_text"]
        })
    }

    async fn execute(&self, params: Value, ctx: &ToolContext) -> ToolResult {
        let params = match parse_params::<Params>(params) {
            Ok(p) => p,
            Err(e) => return e,
        };

        match ctx
            .workspace
            .edit(&params.path, &params.old_text, &params.new_text)
            .await
        {
            Ok(msg) => ToolResult::success(msg),
            Err(e) => ToolResult::error(e),
        }
    }
}
