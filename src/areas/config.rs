//! Repository configuration record
//!
//! `init` writes `.mygitorbit/config.json`:
//!
//! ```text
//! {
//!   "bucket": "my-bucket",
//!   "repoName": "demo"
//! }
//! ```
//!
//! The repository name is the first segment of every remote key, so push, pull
//! and the remote fallback of revert refuse to run without it.

use crate::artifacts::core::error::{IoResultExt, OrbitError};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RepoConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bucket: Option<String>,
    #[serde(default)]
    pub repo_name: Option<String>,
}

impl RepoConfig {
    pub fn new(repo_name: impl Into<String>, bucket: Option<String>) -> Self {
        RepoConfig {
            bucket,
            repo_name: Some(repo_name.into()),
        }
    }

    /// Read the record, returning `None` when the file does not exist yet
    pub fn load(path: &Path) -> anyhow::Result<Option<Self>> {
        if !path.exists() {
            return Ok(None);
        }

        let raw = std::fs::read(path).at_path(path)?;
        let config = serde_json::from_slice(&raw)
            .map_err(|e| anyhow::anyhow!("Malformed repository config {}: {}", path.display(), e))?;

        Ok(Some(config))
    }

    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        let content = serde_json::to_vec_pretty(self)?;
        std::fs::write(path, content).at_path(path)?;

        Ok(())
    }

    pub fn repo_name(&self) -> Result<&str, OrbitError> {
        self.repo_name
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .ok_or_else(|| {
                OrbitError::config_missing("no repoName recorded; re-run `init --name <repoName>`")
            })
    }

    pub fn bucket(&self) -> Option<&str> {
        self.bucket
            .as_deref()
            .map(str::trim)
            .filter(|bucket| !bucket.is_empty())
    }
}
