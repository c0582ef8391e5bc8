use crate::areas::repository::Repository;
use crate::artifacts::core::error::{IoResultExt, OrbitError};
use crate::artifacts::remote::ObjectStore;
use crate::artifacts::remote::key::RemoteKey;
use crate::artifacts::sync::{
    ObjectReport, SyncReport, TransferFailure, TransferOutcome, run_bounded, with_timeout,
};
use bytes::Bytes;
use std::io::Write;

impl Repository {
    /// Upload every file of every local commit, overwriting what the remote holds
    ///
    /// The first failed upload stops the push; the report of settled objects is
    /// printed before the error is returned.
    pub async fn push(&mut self, store: &dyn ObjectStore) -> anyhow::Result<SyncReport> {
        let config = self.config()?;
        let repo_name = config.repo_name()?.to_string();

        let mut keys = Vec::new();
        for commit_id in self.commits().ids()? {
            for file_name in self.commits().files(&commit_id)? {
                keys.push(RemoteKey::new(commit_id, file_name));
            }
        }
        tracing::info!(repo = %repo_name, objects = keys.len(), remote = %store.describe(), "pushing");

        let timeout = self.settings().timeout;
        let commits = self.commits();
        let (report, failure) = run_bounded(keys, self.settings().workers, |key| {
            let remote_key = key.to_key(&repo_name);
            let path = commits.commit_path(&key.commit_id).join(&key.file_name);
            async move {
                let body = tokio::fs::read(&path)
                    .await
                    .at_path(&path)
                    .map_err(|e| (remote_key.clone(), e))?;
                let size = body.len();

                with_timeout(&remote_key, timeout, store.put(&remote_key, Bytes::from(body)))
                    .await
                    .map_err(|e| (remote_key.clone(), e))?;
                tracing::debug!(key = %remote_key, bytes = size, "uploaded");

                Ok::<_, TransferFailure>(ObjectReport::new(
                    remote_key,
                    size,
                    TransferOutcome::Transferred,
                ))
            }
        })
        .await;

        report.write_to(&mut *self.writer())?;
        if let Some(error) = failure {
            return Err(OrbitError::sync("push", report, error).into());
        }

        writeln!(self.writer(), "All commits for repo '{}' pushed.", repo_name)?;
        Ok(report)
    }
}
