//! Parsed-program cache for the Skol front end.
//!
//! Each source file gets one JSON record in the cache directory holding the
//! hash of the content it was parsed from and the parsed [`Program`]. A record
//! whose hash does not match the current content is a miss.

use serde::{Deserialize, Serialize};
use std::hash::{DefaultHasher, Hash, Hasher};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

use crate::config::CONFIG_FILE;
use crate::parser::ast::Program;

/// Cache errors
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("cache IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("corrupt cache record: {0}")]
    Json(#[from] serde_json::Error),
}

/// On-disk record for one source file
#[derive(Debug, Serialize, Deserialize)]
struct CacheRecord {
    content_hash: u64,
    program: Program,
}

/// Cache of parsed programs, stored under the project root
#[derive(Debug, Clone)]
pub struct AstCache {
    dir: PathBuf,
}

impl AstCache {
    pub fn new(project_root: &Path, dir: &str) -> Self {
        Self {
            dir: project_root.join(dir),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Look up the program parsed from `path`. Returns `Ok(None)` on a miss.
    pub fn load(&self, path: &Path, content_hash: u64) -> Result<Option<Program>, CacheError> {
        let entry = self.entry_path(path);
        let content = match std::fs::read_to_string(&entry) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(file = %path.display(), "cache miss");
                return Ok(None);
            }
            Err(e) => return Err(e.into()),
        };
        let record: CacheRecord = serde_json::from_str(&content)?;
        if record.content_hash != content_hash {
            debug!(file = %path.display(), "cache stale");
            return Ok(None);
        }
        debug!(file = %path.display(), "cache hit");
        Ok(Some(record.program))
    }

    /// Store the program parsed from `path`.
    pub fn store(&self, path: &Path, content_hash: u64, program: &Program) -> Result<(), CacheError> {
        std::fs::create_dir_all(&self.dir)?;
        let record = CacheRecord {
            content_hash,
            program: program.clone(),
        };
        let entry = self.entry_path(path);
        std::fs::write(&entry, serde_json::to_string(&record)?)?;
        debug!(file = %path.display(), entry = %entry.display(), "cache write");
        Ok(())
    }

    fn entry_path(&self, path: &Path) -> PathBuf {
        self.dir
            .join(format!("{:016x}.json", hash_content(&path_key(path))))
    }
}

/// Compute a content hash for a string using the default hasher.
pub fn hash_content(content: &str) -> u64 {
    let mut hasher = DefaultHasher::new();
    content.hash(&mut hasher);
    hasher.finish()
}

/// Normalize a path to a stable string key.
fn path_key(path: &Path) -> String {
    path.canonicalize()
        .unwrap_or_else(|_| path.to_path_buf())
        .to_string_lossy()
        .to_string()
}

/// Find the project root by searching for `skol.toml` upward from `start`.
///
/// Falls back to the directory `start` names (or contains).
pub fn find_project_root(start: &Path) -> PathBuf {
    let base = if start.is_file() {
        start.parent().unwrap_or(start).to_path_buf()
    } else {
        start.to_path_buf()
    };
    let mut dir = base.as_path();
    loop {
        if dir.join(CONFIG_FILE).exists() {
            return dir.to_path_buf();
        }
        match dir.parent() {
            Some(parent) => dir = parent,
            None => break,
        }
    }
    base
}

#[cfg(test)]
#[path = "cache_tests.rs"]
mod tests;
