//! Session-wide skill catalog

use std::path::Path;

use tracing::info;

use super::loader::load_skills_from_dir;
use super::skill::Skill;

/// Read-only index of skills, loaded once per session and shared by `Arc`
#[derive(Debug, Default)]
pub struct SkillCatalog {
    skills: Vec<Skill>,
}

impl SkillCatalog {
    pub fn load(dir: &Path) -> Self {
        let skills = load_skills_from_dir(dir);
        info!(count = skills.len(), dir = %dir.display(), "Skill catalog loaded");
        Self { skills }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&Skill> {
        self.skills.iter().find(|s| s.name == name)
    }

    pub fn names(&self) -> Vec<&str> {
        self.skills.iter().map(|s| s.name.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.skills.len()
    }

    pub fn is_empty(&self) -> bool {
        self.skills.is_empty()
    }

    /// Tier-1 listing: one `- name: description` line per skill
    pub fn descriptions(&self) -> String {
        if self.skills.is_empty() {
            return "(no skills available)".to_string();
        }
        self.skills
            .iter()
            .map(|s| format!("- {}: {}", s.name, s.description))
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Tier-2 load, wrapped for injection into the conversation
    pub fn load_content(&self, name: &str) -> Result<String, String> {
        let Some(skill) = self.get(name) else {
            let available = if self.skills.is_empty() {
                "none".to_string()
            } else {
                self.names().join(", ")
            };
            return Err(format!("Unknown skill '{}'. Available: {}", name, available));
        };

        let content = skill
            .render()
            .map_err(|e| format!("Failed to load skill '{}': {}", name, e))?;

        Ok(format!(
            "<skill-loaded name=\"{}\">\n{}\n</skill-loaded>\n\nFollow the instructions in the skill above to complete the user's task.",
            name, content
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn catalog_with(skills: &[(&str, &str)]) -> (tempfile::TempDir, SkillCatalog) {
        let root = tempfile::tempdir().unwrap();
        for (name, description) in skills {
            let dir = root.path().join(name);
            fs::create_dir_all(&dir).unwrap();
            fs::write(
                dir.join("SKILL.md"),
                format!("---\nname: {name}\ndescription: {description}\n---\nSteps for {name}.\n"),
            )
            .unwrap();
        }
        let catalog = SkillCatalog::load(root.path());
        (root, catalog)
    }

    #[test]
    fn descriptions_list_every_skill() {
        let (_root, catalog) = catalog_with(&[("pdf", "PDF tools"), ("mcp", "Build MCP servers")]);
        assert_eq!(
            catalog.descriptions(),
            "- mcp: Build MCP servers\n- pdf: PDF tools"
        );
    }

    #[test]
    fn empty_catalog_descriptions() {
        assert_eq!(SkillCatalog::empty().descriptions(), "(no skills available)");
    }

    #[test]
    fn unknown_skill_lists_available_names() {
        let (_root, catalog) = catalog_with(&[("pdf", "PDF tools"), ("mcp", "Build MCP servers")]);
        let err = catalog.load_content("docx").unwrap_err();
        assert_eq!(err, "Unknown skill 'docx'. Available: mcp, pdf");

        let err = SkillCatalog::empty().load_content("docx").unwrap_err();
        assert_eq!(err, "Unknown skill 'docx'. Available: none");
    }

    #[test]
    fn load_wraps_body() {
        let (_root, catalog) = catalog_with(&[("pdf", "PDF tools")]);
        let content = catalog.load_content("pdf").unwrap();
        assert!(content.starts_with("<skill-loaded name=\"pdf\">\n# Skill: pdf\n\nSteps for pdf."));
        assert!(content.contains("</skill-loaded>"));
        assert_eq!(content, catalog.load_content("pdf").unwrap());
    }
}
