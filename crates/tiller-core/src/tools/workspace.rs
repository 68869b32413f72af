//! Workspace-confined file access
//!
//! Every path is resolved physically against the canonical workspace root:
//! each existing prefix is canonicalized as the walk proceeds, so symlinks
//! and `..` cannot lead outside. Paths that do not exist yet are checked the
//! same way, so a write can never land outside the root either.

use std::ffi::OsString;
use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};

use thiserror::Error;
use tokio::fs;

use super::truncation::{truncate_head_chars, truncate_head_lines, MAX_OUTPUT_CHARS};

#[derive(Debug, Error)]
pub enum FileError {
    #[error("Path escapes workspace: {0}")]
    PathEscape(String),

    #[error("File not found: {0}")]
    NotFound(String),

    #[error("File is not valid UTF-8 text: {0}")]
    NotUtf8(String),

    #[error("Text not found in {0}")]
    TextNotFound(String),

    #[error("old_text must not be empty")]
    EmptyOldText,

    #[error("{path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

impl FileError {
    fn io(path: &str, source: std::io::Error) -> Self {
        if source.kind() == ErrorKind::NotFound {
            return Self::NotFound(path.to_string());
        }
        Self::Io {
            path: path.to_string(),
            source,
        }
    }
}

/// File accessor bound to one workspace root
#[derive(Debug, Clone)]
pub struct Workspace {
    root: PathBuf,
}

impl Workspace {
    /// Bind to `root`, which must exist
    pub fn new(root: impl AsRef<Path>) -> Result<Self, FileError> {
        let root = root.as_ref();
        let root = std::fs::canonicalize(root)
            .map_err(|e| FileError::io(&root.display().to_string(), e))?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolve `path` to a physical location inside the workspace
    pub fn resolve(&self, path: &str) -> Result<PathBuf, FileError> {
        let raw = Path::new(path);
        let joined = if raw.is_absolute() {
            raw.to_path_buf()
        } else {
            self.root.join(raw)
        };

        let mut resolved = PathBuf::new();
        for component in joined.components() {
            match component {
                Component::Prefix(_) | Component::RootDir => resolved.push(component.as_os_str()),
                Component::CurDir => {}
                Component::ParentDir => {
                    resolved.pop();
                }
                Component::Normal(name) => {
                    resolved.push(name);
                    match std::fs::canonicalize(&resolved) {
                        Ok(canonical) => resolved = canonical,
                        // A dangling symlink cannot be followed safely.
                        Err(_) if std::fs::symlink_metadata(&resolved).is_ok() => {
                            return Err(FileError::PathEscape(path.to_string()));
                        }
                        Err(_) => {}
                    }
                }
            }
        }

        if !resolved.starts_with(&self.root) {
            tracing::warn!(path = %path, "Rejected path outside workspace");
            return Err(FileError::PathEscape(path.to_string()));
        }
        Ok(resolved)
    }

    /// Read a text file, optionally only its first `limit` lines
    pub async fn read(&self, path: &str, limit: Option<usize>) -> Result<String, FileError> {
        let resolved = self.resolve(path)?;
        let bytes = fs::read(&resolved)
            .await
            .map_err(|e| FileError::io(path, e))?;
        let text = String::from_utf8(bytes).map_err(|_| FileError::NotUtf8(path.to_string()))?;

        let text = match limit {
            Some(limit) => truncate_head_lines(&text, limit).text,
            None => text,
        };
        Ok(truncate_head_chars(&text, MAX_OUTPUT_CHARS).text)
    }

    /// Replace the whole file, creating parent directories as needed
    pub async fn write(&self, path: &str, content: &str) -> Result<String, FileError> {
        let resolved = self.resolve(path)?;
        if let Some(parent) = resolved.parent() {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| FileError::io(path, e))?;
        }

        write_atomic(&resolved, content)
            .await
            .map_err(|e| FileError::io(path, e))?;

        tracing::debug!(path = %resolved.display(), bytes = content.len(), "File written");
        Ok(format!("Wrote {} bytes to {}", content.len(), path))
    }

    /// Replace the first occurrence of `old_text` with `new_text`
    pub async fn edit(&self, path: &str, old_text: &str, new_text: &str) -> Result<String, FileError> {
        if old_text.is_empty() {
            return Err(FileError::EmptyOldText);
        }

        let resolved = self.resolve(path)?;
        let bytes = fs::read(&resolved)
            .await
            .map_err(|e| FileError::io(path, e))?;
        let content = String::from_utf8(bytes).map_err(|_| FileError::NotUtf8(path.to_string()))?;

        if !content.contains(old_text) {
            return Err(FileError::TextNotFound(path.to_string()));
        }

        let updated = content.replacen(old_text, new_text, 1);
        write_atomic(&resolved, &updated)
            .await
            .map_err(|e| FileError::io(path, e))?;

        tracing::debug!(path = %resolved.display(), "File edited");
        Ok(format!("Edited {}", path))
    }
}

/// Write to a sibling temp file, then rename over the target
async fn write_atomic(target: &Path, content: &str) -> std::io::Result<()> {
    let mut tmp_name = OsString::from(".");
    tmp_name.push(target.file_name().unwrap_or_default());
    tmp_name.push(format!(".{}.tmp", uuid::Uuid::new_v4().simple()));
    let tmp = target.with_file_name(tmp_name);

    if let Err(e) = fs::write(&tmp, content).await {
        let _ = fs::remove_file(&tmp).await;
        return Err(e);
    }
    if let Err(e) = fs::rename(&tmp, target).await {
        let _ = fs::remove_file(&tmp).await;
        return Err(e);
    }
    Ok(())
}
