//! Skill filesystem loading

use std::fs;
use std::path::Path;

use tracing::debug;

use super::skill::{Skill, SKILL_FILE};

/// Load all skills from a directory
///
/// Every immediate subdirectory holding a `SKILL.md` is tried; malformed
/// descriptors are skipped. Result is sorted by name, duplicates dropped.
pub fn load_skills_from_dir(dir: &Path) -> Vec<Skill> {
    let mut skills = Vec::new();

    if !dir.is_dir() {
        debug!("Skills directory {:?} not found", dir);
        return skills;
    }

    let Ok(entries) = fs::read_dir(dir) else {
        return skills;
    };

    for entry in entries.flatten() {
        let Ok(file_type) = entry.file_type() else {
            continue;
        };
        if !file_type.is_dir() {
            continue;
        }

        let path = entry.path();
        if !path.join(SKILL_FILE).is_file() {
            continue;
        }

        match Skill::load(&path) {
            Ok(skill) => {
                debug!("Loaded skill: {} from {:?}", skill.name, path);
                skills.push(skill);
            }
            Err(e) => {
                debug!("Failed to load skill from {:?}: {}", path, e);
            }
        }
    }

    skills.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.dir.cmp(&b.dir)));
    skills.dedup_by(|later, earlier| {
        let duplicate = later.name == earlier.name;
        if duplicate {
            debug!("Ignoring duplicate skill '{}' in {:?}", later.name, later.dir);
        }
        duplicate
    });
    skills
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_skill(root: &Path, dir: &str, content: &str) {
        let skill_dir = root.join(dir);
        fs::create_dir_all(&skill_dir).unwrap();
        fs::write(skill_dir.join(SKILL_FILE), content).unwrap();
    }

    #[test]
    fn loads_valid_and_skips_malformed() {
        let root = tempfile::tempdir().unwrap();
        write_skill(
            root.path(),
            "zeta",
            "---\nname: zeta\ndescription: Last one\n---\nbody",
        );
        write_skill(
            root.path(),
            "alpha",
            "---\nname: alpha\ndescription: First one\n---\nbody",
        );
        write_skill(root.path(), "broken", "no header at all");
        fs::create_dir_all(root.path().join("empty")).unwrap();
        fs::write(root.path().join("stray.md"), "not a skill").unwrap();

        let skills = load_skills_from_dir(root.path());
        let names: Vec<_> = skills.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["alpha", "zeta"]);
    }

    #[test]
    fn duplicate_names_keep_one() {
        let root = tempfile::tempdir().unwrap();
        write_skill(root.path(), "a", "---\nname: dup\ndescription: one\n---\n");
        write_skill(root.path(), "b", "---\nname: dup\ndescription: two\n---\n");

        let skills = load_skills_from_dir(root.path());
        assert_eq!(skills.len(), 1);
        assert_eq!(skills[0].description, "one");
    }

    #[test]
    fn missing_directory_is_empty() {
        let root = tempfile::tempdir().unwrap();
        assert!(load_skills_from_dir(&root.path().join("nope")).is_empty());
    }
}
