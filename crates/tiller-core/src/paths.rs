//! Centralized path utilities

use std::path::{Path, PathBuf};

const CONFIG_DIR_NAME: &str = ".tiller";
const SKILLS_DIR_NAME: &str = "skills";

/// Get the tiller config directory (~/.tiller)
pub fn config_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(CONFIG_DIR_NAME)
}

/// Get the logs directory (~/.tiller/logs)
pub fn logs_dir() -> PathBuf {
    config_dir().join("logs")
}

/// Default skills directory for a workspace (`<workspace>/skills`)
pub fn workspace_skills_dir(workspace: &Path) -> PathBuf {
    workspace.join(SKILLS_DIR_NAME)
}
