use crate::artifacts::objects::commit_id::CommitId;
use crate::artifacts::objects::commit_record::COMMIT_RECORD_FILE;
use derive_new::new;

const COMMITS_SEGMENT: &str = "commits";

/// Prefix shared by every object of a repository
pub fn commits_prefix(repo_name: &str) -> String {
    format!("{}/{}/", repo_name, COMMITS_SEGMENT)
}

/// Address of one commit file in the remote store
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, new)]
pub struct RemoteKey {
    pub commit_id: CommitId,
    pub file_name: String,
}

impl RemoteKey {
    pub fn to_key(&self, repo_name: &str) -> String {
        format!(
            "{}{}/{}",
            commits_prefix(repo_name),
            self.commit_id,
            self.file_name
        )
    }

    pub fn is_record(&self) -> bool {
        self.file_name == COMMIT_RECORD_FILE
    }

    /// Split a listed key back into commit id and file name
    ///
    /// Keys outside the repository prefix, with extra path segments, or whose id
    /// segment is not a lowercase hyphenated commit id yield `None`.
    pub fn parse(repo_name: &str, key: &str) -> Option<Self> {
        let rest = key.strip_prefix(&commits_prefix(repo_name))?;
        let (commit_id, file_name) = rest.split_once('/')?;

        if file_name.is_empty() || file_name.contains('/') || matches!(file_name, "." | "..") {
            return None;
        }

        let parsed = CommitId::try_parse(commit_id).ok()?;
        // only the canonical rendering round-trips through `to_key`
        if parsed.to_string() != commit_id {
            return None;
        }

        Some(RemoteKey::new(parsed, file_name.to_string()))
    }
}
