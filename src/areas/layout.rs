//! On-disk repository layout
//!
//! Everything the repository persists lives below a marker directory in the
//! working tree root:
//!
//! ```text
//! .mygitorbit/
//!   config.json
//!   staged/<file>
//!   commits/<commit-id>/<file...>
//!   commits/<commit-id>/commit.json
//!   incoming/<download>
//! ```
//!
//! `incoming/` only holds downloads in flight; a finished download is renamed into
//! its commit directory.
//!
//! Directory creation is idempotent: asking for a directory that already exists
//! is not an error.

use crate::artifacts::core::error::{IoResultExt, OrbitError};
use crate::artifacts::objects::commit_id::CommitId;
use std::path::{Path, PathBuf};

/// Name of the marker directory created by `init`
pub const REPOSITORY_MARKER: &str = ".mygitorbit";

const STAGING_DIR: &str = "staged";
const COMMITS_DIR: &str = "commits";
const CONFIG_FILE: &str = "config.json";
const INCOMING_DIR: &str = "incoming";

#[derive(Debug, Clone)]
pub struct Layout {
    /// Absolute path of the marker directory
    path: Box<Path>,
}

impl Layout {
    pub fn new(root: &Path) -> Self {
        Layout {
            path: root.join(REPOSITORY_MARKER).into_boxed_path(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn config_path(&self) -> PathBuf {
        self.path.join(CONFIG_FILE)
    }

    pub fn staging_path(&self) -> PathBuf {
        self.path.join(STAGING_DIR)
    }

    pub fn commits_path(&self) -> PathBuf {
        self.path.join(COMMITS_DIR)
    }

    pub fn commit_path(&self, commit_id: &CommitId) -> PathBuf {
        self.commits_path().join(commit_id.to_string())
    }

    pub fn incoming_path(&self) -> PathBuf {
        self.path.join(INCOMING_DIR)
    }

    pub fn ensure_incoming_dir(&self) -> Result<PathBuf, OrbitError> {
        ensure_dir(&self.incoming_path())
    }

    pub fn is_initialized(&self) -> bool {
        self.config_path().is_file()
    }

    pub fn ensure_root(&self) -> Result<PathBuf, OrbitError> {
        ensure_dir(&self.path)
    }

    pub fn ensure_staging_dir(&self) -> Result<PathBuf, OrbitError> {
        ensure_dir(&self.staging_path())
    }

    pub fn ensure_commits_dir(&self) -> Result<PathBuf, OrbitError> {
        ensure_dir(&self.commits_path())
    }

    pub fn commit_dir_for(&self, commit_id: &CommitId) -> Result<PathBuf, OrbitError> {
        ensure_dir(&self.commit_path(commit_id))
    }
}

/// Create `path` and its missing ancestors
pub fn ensure_dir(path: &Path) -> Result<PathBuf, OrbitError> {
    std::fs::create_dir_all(path).at_path(path)?;
    Ok(path.to_path_buf())
}

/// Names of the regular files directly inside `dir`, sorted by name
///
/// A missing directory reads as empty.
pub fn list_file_names(dir: &Path) -> Result<Vec<String>, OrbitError> {
    list_entries(dir, |file_type| file_type.is_file())
}

/// Names of the subdirectories directly inside `dir`, sorted by name
pub fn list_dir_names(dir: &Path) -> Result<Vec<String>, OrbitError> {
    list_entries(dir, |file_type| file_type.is_dir())
}

fn list_entries(
    dir: &Path,
    keep: impl Fn(&std::fs::FileType) -> bool,
) -> Result<Vec<String>, OrbitError> {
    if !dir.exists() {
        return Ok(Vec::new());
    }

    let mut names = Vec::new();
    for entry in std::fs::read_dir(dir).at_path(dir)? {
        let entry = entry.at_path(dir)?;
        let file_type = entry.file_type().at_path(&entry.path())?;

        if keep(&file_type) {
            names.push(entry.file_name().to_string_lossy().into_owned());
        }
    }
    names.sort();

    Ok(names)
}
