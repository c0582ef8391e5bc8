//! Local commit store
//!
//! Read access to `.mygitorbit/commits/`. Each subdirectory named by a commit id
//! is one commit; directories whose names do not parse as commit ids are not
//! commits and are skipped. Commit directories are only ever created or filled
//! with missing files, never rewritten.

use crate::areas::layout::{list_dir_names, list_file_names};
use crate::artifacts::core::error::{IoResultExt, OrbitError};
use crate::artifacts::objects::commit_id::CommitId;
use crate::artifacts::objects::commit_record::{COMMIT_RECORD_FILE, CommitRecord};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub struct CommitStore {
    path: Box<Path>,
}

/// A commit id paired with its metadata, if the record could be read
#[derive(Debug, Clone)]
pub struct CommitSummary {
    pub id: CommitId,
    pub record: Option<CommitRecord>,
}

impl CommitStore {
    pub fn new(path: Box<Path>) -> Self {
        CommitStore { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn commit_path(&self, commit_id: &CommitId) -> PathBuf {
        self.path.join(commit_id.to_string())
    }

    /// A commit is complete once its record is written; the record always lands
    /// after the snapshot files, both on commit and on pull.
    pub fn is_complete(&self, commit_id: &CommitId) -> bool {
        self.commit_path(commit_id).join(COMMIT_RECORD_FILE).is_file()
    }

    /// Ids of every local commit, sorted
    pub fn ids(&self) -> Result<Vec<CommitId>, OrbitError> {
        Ok(list_dir_names(&self.path)?
            .into_iter()
            .filter_map(|name| match CommitId::try_parse(&name) {
                Ok(id) => Some(id),
                Err(_) => {
                    tracing::debug!(dir = %name, "skipping non-commit directory");
                    None
                }
            })
            .collect())
    }

    /// Every file of a commit, `commit.json` included, sorted by name
    pub fn files(&self, commit_id: &CommitId) -> Result<Vec<String>, OrbitError> {
        list_file_names(&self.commit_path(commit_id))
    }

    /// Files of a commit that belong to the snapshot, i.e. everything except `commit.json`
    pub fn snapshot_files(&self, commit_id: &CommitId) -> Result<Vec<String>, OrbitError> {
        Ok(self
            .files(commit_id)?
            .into_iter()
            .filter(|name| name != COMMIT_RECORD_FILE)
            .collect())
    }

    pub fn read_record(&self, commit_id: &CommitId) -> anyhow::Result<CommitRecord> {
        let path = self.commit_path(commit_id).join(COMMIT_RECORD_FILE);
        let data = std::fs::read(&path).at_path(&path)?;

        CommitRecord::from_json(&data)
    }

    /// All local commits, newest first; ties on the date fall back to the id order
    pub fn history(&self) -> Result<Vec<CommitSummary>, OrbitError> {
        let mut commits = self
            .ids()?
            .into_iter()
            .map(|id| {
                let record = match self.read_record(&id) {
                    Ok(record) => Some(record),
                    Err(e) => {
                        tracing::warn!(commit = %id, "unreadable commit record: {:#}", e);
                        None
                    }
                };
                CommitSummary { id, record }
            })
            .collect::<Vec<_>>();

        commits.sort_by(|a, b| {
            let a_date = a.record.as_ref().map(CommitRecord::date);
            let b_date = b.record.as_ref().map(CommitRecord::date);
            b_date.cmp(&a_date).then_with(|| a.id.cmp(&b.id))
        });

        Ok(commits)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_fs::TempDir;
    use assert_fs::prelude::*;
    use chrono::{TimeZone, Utc};
    use pretty_assertions::assert_eq;

    fn write_commit(root: &TempDir, id: &CommitId, message: &str, hour: u32) {
        let dir = root.child(id.to_string());
        dir.create_dir_all().unwrap();
        let date = Utc.with_ymd_and_hms(2024, 1, 1, hour, 0, 0).unwrap();
        let record = CommitRecord::new(message.to_string(), date);
        dir.child(COMMIT_RECORD_FILE)
            .write_binary(&record.to_json().unwrap())
            .unwrap();
    }

    #[test]
    fn history_is_newest_first_and_skips_foreign_directories() {
        let root = TempDir::new().unwrap();
        let older = CommitId::generate();
        let newer = CommitId::generate();
        write_commit(&root, &older, "older", 9);
        write_commit(&root, &newer, "newer", 10);
        root.child("not-a-commit").create_dir_all().unwrap();

        let store = CommitStore::new(root.path().to_path_buf().into_boxed_path());
        let messages = store
            .history()
            .unwrap()
            .into_iter()
            .map(|summary| summary.record.unwrap().message().to_string())
            .collect::<Vec<_>>();

        assert_eq!(messages, vec!["newer", "older"]);
    }

    #[test]
    fn snapshot_files_leave_out_the_record() {
        let root = TempDir::new().unwrap();
        let id = CommitId::generate();
        write_commit(&root, &id, "m", 1);
        root.child(id.to_string()).child("a.txt").write_str("a").unwrap();

        let store = CommitStore::new(root.path().to_path_buf().into_boxed_path());

        assert_eq!(store.files(&id).unwrap(), vec!["a.txt", "commit.json"]);
        assert_eq!(store.snapshot_files(&id).unwrap(), vec!["a.txt"]);
    }

    #[test]
    fn commit_without_record_is_still_listed() {
        let root = TempDir::new().unwrap();
        let id = CommitId::generate();
        root.child(id.to_string()).create_dir_all().unwrap();

        let store = CommitStore::new(root.path().to_path_buf().into_boxed_path());
        let history = store.history().unwrap();

        assert_eq!(history.len(), 1);
        assert!(history[0].record.is_none());
    }
}
