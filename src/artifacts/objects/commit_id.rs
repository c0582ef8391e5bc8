//! Commit identifier
//!
//! Commits are named by a random UUID (v4) rather than by their content, so two
//! commits with identical files still get distinct identifiers. The hyphenated,
//! lowercase rendering is used both as the commit directory name and as the
//! middle segment of remote keys.

use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Length of the short form printed by `log --oneline`
pub const SHORT_COMMIT_ID_LENGTH: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CommitId(Uuid);

impl CommitId {
    /// Generate a fresh identifier. Collisions are not checked for.
    pub fn generate() -> Self {
        CommitId(Uuid::new_v4())
    }

    /// Parse an identifier from a directory name, a remote key segment or user input
    pub fn try_parse(id: &str) -> anyhow::Result<Self> {
        let uuid = Uuid::parse_str(id.trim())
            .map_err(|e| anyhow::anyhow!("Invalid commit id '{}': {}", id, e))?;
        Ok(CommitId(uuid))
    }

    pub fn to_short_id(&self) -> String {
        self.to_string()[..SHORT_COMMIT_ID_LENGTH].to_string()
    }
}

impl FromStr for CommitId {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CommitId::try_parse(s)
    }
}

impl fmt::Display for CommitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.hyphenated())
    }
}
