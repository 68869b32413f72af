//! Agent roles and their tool access

use serde::Serialize;

use crate::tools::registry::ToolName;

/// Which tools a role may call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToolAccess {
    /// Every base tool (delegation is stripped separately)
    All,
    /// Only the listed tools
    Specific(Vec<ToolName>),
}

impl ToolAccess {
    pub fn allows(&self, name: ToolName) -> bool {
        match self {
            ToolAccess::All => true,
            ToolAccess::Specific(names) => names.contains(&name),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AgentRole {
    Explore,
    Code,
    Plan,
}

impl AgentRole {
    pub const ALL: [AgentRole; 3] = [AgentRole::Explore, AgentRole::Code, AgentRole::Plan];

    pub fn as_str(self) -> &'static str {
        match self {
            AgentRole::Explore => "explore",
            AgentRole::Code => "code",
            AgentRole::Plan => "plan",
        }
    }

    pub fn parse(tag: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|r| r.as_str() == tag)
    }

    /// One-line description shown to the delegating model
    pub fn description(self) -> &'static str {
        match self {
            AgentRole::Explore => "Read-only agent for exploring code, finding files, searching",
            AgentRole::Code => "Full agent for implementing features and fixing bugs",
            AgentRole::Plan => "Planning agent for designing implementation strategies",
        }
    }

    /// Role instructions placed in the subagent's system prompt
    pub fn preamble(self) -> &'static str {
        match self {
            AgentRole::Explore => {
                "You are an exploration agent. Search and analyze, but never modify files. Return a concise summary."
            }
            AgentRole::Code => {
                "You are a coding agent. Implement the requested changes efficiently."
            }
            AgentRole::Plan => {
                "You are a planning agent. Analyze the codebase and output a numbered implementation plan. Do not make changes."
            }
        }
    }

    pub fn tool_access(self) -> ToolAccess {
        match self {
            AgentRole::Explore | AgentRole::Plan => {
                ToolAccess::Specific(vec![ToolName::Bash, ToolName::ReadFile])
            }
            AgentRole::Code => ToolAccess::All,
        }
    }

    /// `- role: description` lines for prompts and the Task tool
    pub fn descriptions() -> String {
        Self::ALL
            .iter()
            .map(|r| format!("- {}: {}", r.as_str(), r.description()))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn read_only_roles_cannot_write() {
        for role in [AgentRole::Explore, AgentRole::Plan] {
            let access = role.tool_access();
            assert!(access.allows(ToolName::Bash));
            assert!(access.allows(ToolName::ReadFile));
            assert!(!access.allows(ToolName::WriteFile));
            assert!(!access.allows(ToolName::EditFile));
            assert!(!access.allows(ToolName::Task));
        }
    }

    #[test]
    fn parse_is_exact() {
        assert_eq!(AgentRole::parse("code"), Some(AgentRole::Code));
        assert_eq!(AgentRole::parse("Code"), None);
        assert_eq!(AgentRole::parse("debugger"), None);
    }

    #[test]
    fn descriptions_cover_all_roles() {
        let text = AgentRole::descriptions();
        assert_eq!(text.lines().count(), 3);
        assert!(text.starts_with("- explore: "));
    }
}
