//! Skills: on-disk knowledge packets
//!
//! Each skill is a directory holding a `SKILL.md` with a small `---` header
//! (name, description) and a markdown body, plus optional `scripts/`,
//! `references/` and `assets/` folders.
//!
//! Disclosure happens in two tiers: the catalog's one-line descriptions are
//! always in the system prompt, the body is only read when the model asks
//! for it through the `Skill` tool.

mod catalog;
mod loader;
mod skill;

pub use catalog::SkillCatalog;
pub use loader::load_skills_from_dir;
pub use skill::{ResourceIndex, Skill, SkillError};
