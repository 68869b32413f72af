//! Skill tool - load a skill's full instructions into the conversation

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::skills::SkillCatalog;
use crate::tools::registry::{parse_params, Tool, ToolContext, ToolName, ToolResult};

pub struct SkillTool {
    description: String,
}

#[derive(Deserialize)]
struct Params {
    skill: String,
}

impl SkillTool {
    /// Description embeds the catalog's one-line listing
    pub fn new(catalog: &SkillCatalog) -> Self {
        Self {
            description: format!(
                "Load a skill to gain specialized knowledge for a task.\n\n\
                 Available skills:\n{}\n\n\
                 Use this immediately when the user's task matches a skill description. \
                 The skill content is injected into the conversation.",
                catalog.descriptions()
            ),
        }
    }
}

#[async_trait]
impl Tool for SkillTool {
    fn name(&self) -> ToolName {
        ToolName::Skill
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "skill": {
                    "type": "string",
                    "description": "Name of the skill to load"
                }
            },
            "required": ["skill"]
        })
    }

    async fn execute(&self, params: Value, ctx: &ToolContext) -> ToolResult {
        let params = match parse_params::<Params>(params) {
            Ok(p) => p,
            Err(e) => return e,
        };

        match ctx.skills.load_content(&params.skill) {
            Ok(content) => {
                tracing::info!(skill = %params.skill, chars = content.len(), "Skill loaded");
                ToolResult::success(content)
            }
            Err(e) => ToolResult::error(e),
        }
    }
}
