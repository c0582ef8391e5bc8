use crate::areas::repository::Repository;
use crate::artifacts::core::error::{IoResultExt, OrbitError};
use crate::artifacts::objects::commit_id::CommitId;
use crate::artifacts::objects::commit_record::{COMMIT_RECORD_FILE, CommitRecord};
use anyhow::Context;
use futures::{StreamExt, TryStreamExt, stream};
use std::io::Write;
use std::path::Path;

impl Repository {
    /// Snapshot the staging area into a new commit
    ///
    /// Staged files are copied in name order through the worker pool; `commit.json`
    /// is written once every copy has finished. The staging area is emptied
    /// afterwards unless `keep_staged` is set.
    pub async fn commit(&mut self, message: &str, keep_staged: bool) -> anyhow::Result<CommitId> {
        self.layout()
            .ensure_commits_dir()
            .context("Failed to create commits directory")?;

        let commit_id = CommitId::generate();
        let commit_dir = self.layout().commit_dir_for(&commit_id)?;
        let staged_files = self.staging().staged_files()?;
        tracing::debug!(commit = %commit_id, files = staged_files.len(), "creating commit");

        let staging = self.staging();
        stream::iter(staged_files.iter())
            .map(|file_name| {
                let source = staging.file_path(file_name);
                let destination = commit_dir.join(file_name);
                async move { copy_file(&source, &destination).await }
            })
            .buffer_unordered(self.settings().workers)
            .try_collect::<Vec<_>>()
            .await?;

        let record = CommitRecord::now(message);
        let record_path = commit_dir.join(COMMIT_RECORD_FILE);
        tokio::fs::write(&record_path, record.to_json()?)
            .await
            .at_path(&record_path)?;

        if !keep_staged {
            self.staging().unstage(&staged_files)?;
        }

        writeln!(
            self.writer(),
            "Commit created with id {} and message \"{}\"",
            commit_id,
            message
        )?;
        tracing::info!(commit = %commit_id, files = staged_files.len(), "commit created");

        Ok(commit_id)
    }
}

async fn copy_file(source: &Path, destination: &Path) -> Result<u64, OrbitError> {
    tokio::fs::copy(source, destination).await.at_path(source)
}
