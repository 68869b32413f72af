//! Skill descriptor parsing

use std::fs;
use std::path::{Path, PathBuf};

use once_cell::sync::{Lazy, OnceCell};
use regex::Regex;
use thiserror::Error;

pub(crate) const SKILL_FILE: &str = "SKILL.md";

static FRONTMATTER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)\A---[ \t]*\r?\n(.*?)\r?\n---[ \t]*\r?\n(.*)\z").unwrap()
});

#[derive(Debug, Error)]
pub enum SkillError {
    #[error("missing '---' frontmatter block")]
    MissingFrontmatter,

    #[error("frontmatter field '{0}' is required")]
    MissingField(&'static str),

    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// File names found under a skill's resource folders
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResourceIndex {
    pub scripts: Vec<String>,
    pub references: Vec<String>,
    pub assets: Vec<String>,
}

impl ResourceIndex {
    pub fn scan(dir: &Path) -> Self {
        Self {
            scripts: list_files(&dir.join("scripts")),
            references: list_files(&dir.join("references")),
            assets: list_files(&dir.join("assets")),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.scripts.is_empty() && self.references.is_empty() && self.assets.is_empty()
    }

    fn sections(&self) -> [(&'static str, &[String]); 3] {
        [
            ("Scripts", self.scripts.as_slice()),
            ("References", self.references.as_slice()),
            ("Assets", self.assets.as_slice()),
        ]
    }
}

fn list_files(dir: &Path) -> Vec<String> {
    let Ok(entries) = fs::read_dir(dir) else {
        return Vec::new();
    };
    let mut names: Vec<String> = entries
        .flatten()
        .filter(|e| e.file_type().map(|t| t.is_file()).unwrap_or(false))
        .map(|e| e.file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

/// A parsed skill. Metadata is read at startup, the body on first load.
#[derive(Debug)]
pub struct Skill {
    pub name: String,
    pub description: String,
    pub dir: PathBuf,
    pub resources: ResourceIndex,
    body: OnceCell<String>,
}

impl Skill {
    /// Parse the descriptor in `dir`, keeping only metadata
    pub fn load(dir: &Path) -> Result<Self, SkillError> {
        let path = dir.join(SKILL_FILE);
        let content = fs::read_to_string(&path).map_err(|source| SkillError::Io {
            path: path.clone(),
            source,
        })?;
        let (name, description, _) = parse_descriptor(&content)?;

        Ok(Self {
            name,
            description,
            dir: dir.to_path_buf(),
            resources: ResourceIndex::scan(dir),
            body: OnceCell::new(),
        })
    }

    /// Body text, read from disk once and cached
    pub fn body(&self) -> Result<&str, SkillError> {
        self.body
            .get_or_try_init(|| {
                let path = self.dir.join(SKILL_FILE);
                let content = fs::read_to_string(&path)
                    .map_err(|source| SkillError::Io { path, source })?;
                let (_, _, body) = parse_descriptor(&content)?;
                Ok(body)
            })
            .map(String::as_str)
    }

    pub fn is_materialized(&self) -> bool {
        self.body.get().is_some()
    }

    /// Tier-2 content: heading, body and resource listing
    pub fn render(&self) -> Result<String, SkillError> {
        let mut content = format!("# Skill: {}\n\n{}", self.name, self.body()?);

        if !self.resources.is_empty() {
            content.push_str(&format!(
                "\n\n**Available resources in {}:**",
                self.dir.display()
            ));
            for (label, files) in self.resources.sections() {
                if !files.is_empty() {
                    content.push_str(&format!("\n- {}: {}", label, files.join(", ")));
                }
            }
        }

        Ok(content)
    }
}

/// Split a descriptor into (name, description, body)
pub(crate) fn parse_descriptor(content: &str) -> Result<(String, String, String), SkillError> {
    let captures = FRONTMATTER
        .captures(content)
        .ok_or(SkillError::MissingFrontmatter)?;
    let header = captures.get(1).map_or("", |m| m.as_str());
    let body = captures.get(2).map_or("", |m| m.as_str()).trim().to_string();

    let mut name = None;
    let mut description = None;
    for line in header.lines() {
        let Some((key, value)) = line.split_once(':') else {
            continue;
        };
        let value = value.trim().trim_matches(|c| c == '"' || c == '\'').to_string();
        match key.trim() {
            "name" => name = Some(value),
            "description" => description = Some(value),
            _ => {}
        }
    }

    let name = name
        .filter(|n| !n.is_empty())
        .ok_or(SkillError::MissingField("name"))?;
    let description = description
        .filter(|d| !d.is_empty())
        .ok_or(SkillError::MissingField("description"))?;

    Ok((name, description, body))
}
