use crate::areas::layout::ensure_dir;
use crate::areas::repository::Repository;
use crate::artifacts::core::error::{IoResultExt, OrbitError};
use crate::artifacts::remote::ObjectStore;
use crate::artifacts::remote::key::{RemoteKey, commits_prefix};
use crate::artifacts::sync::{
    ObjectReport, SyncReport, TransferFailure, TransferOutcome, run_bounded, with_timeout,
};
use std::io::Write;
use std::path::Path;
use uuid::Uuid;

impl Repository {
    /// Download remote commit files that are missing locally
    ///
    /// Local files are never rewritten and local-only commits are kept, so pulling
    /// only ever adds to the commit store. Snapshot files are fetched before any
    /// `commit.json`, and each download is renamed into place once complete, so a
    /// failed pull never leaves a commit that looks complete.
    pub async fn pull(&mut self, store: &dyn ObjectStore) -> anyhow::Result<SyncReport> {
        let config = self.config()?;
        let repo_name = config.repo_name()?.to_string();
        let timeout = self.settings().timeout;

        let prefix = commits_prefix(&repo_name);
        let listed = with_timeout(&prefix, timeout, store.list_keys_with_prefix(&prefix)).await?;
        let mut keys = listed
            .iter()
            .filter_map(|key| {
                let parsed = RemoteKey::parse(&repo_name, key);
                if parsed.is_none() {
                    tracing::debug!(%key, "ignoring key outside the commit layout");
                }
                parsed
            })
            .collect::<Vec<_>>();
        keys.sort();
        tracing::info!(repo = %repo_name, objects = keys.len(), remote = %store.describe(), "pulling");

        self.layout().ensure_commits_dir()?;
        let incoming = self.layout().ensure_incoming_dir()?;
        let (records, snapshots): (Vec<_>, Vec<_>) =
            keys.into_iter().partition(RemoteKey::is_record);

        let (mut report, mut failure) = self
            .download_missing(store, &repo_name, snapshots, &incoming)
            .await;
        if failure.is_none() {
            let (record_report, record_failure) = self
                .download_missing(store, &repo_name, records, &incoming)
                .await;
            report.absorb(record_report);
            failure = record_failure;
        }

        report.write_to(&mut *self.writer())?;
        if let Some(error) = failure {
            return Err(OrbitError::sync("pull", report, error).into());
        }

        writeln!(
            self.writer(),
            "Pulled {} objects ({} already present) for repo '{}'.",
            report.transferred(),
            report.skipped(),
            repo_name
        )?;
        Ok(report)
    }

    async fn download_missing(
        &self,
        store: &dyn ObjectStore,
        repo_name: &str,
        keys: Vec<RemoteKey>,
        incoming: &Path,
    ) -> (SyncReport, Option<OrbitError>) {
        let timeout = self.settings().timeout;
        let commits = self.commits();

        run_bounded(keys, self.settings().workers, |key| {
            let remote_key = key.to_key(repo_name);
            let commit_dir = commits.commit_path(&key.commit_id);
            let path = commit_dir.join(&key.file_name);
            let partial = incoming.join(Uuid::new_v4().simple().to_string());
            async move {
                if path.exists() {
                    return Ok(ObjectReport::new(remote_key, 0, TransferOutcome::Skipped));
                }

                let body = with_timeout(&remote_key, timeout, store.get(&remote_key))
                    .await
                    .map_err(|e| (remote_key.clone(), e))?;
                ensure_dir(&commit_dir).map_err(|e| (remote_key.clone(), e))?;
                if let Err(e) = place_download(&partial, &path, &body).await {
                    tokio::fs::remove_file(&partial).await.ok();
                    return Err((remote_key, e));
                }
                tracing::debug!(key = %remote_key, bytes = body.len(), "downloaded");

                Ok::<_, TransferFailure>(ObjectReport::new(
                    remote_key,
                    body.len(),
                    TransferOutcome::Transferred,
                ))
            }
        })
        .await
    }
}

async fn place_download(partial: &Path, path: &Path, body: &[u8]) -> Result<(), OrbitError> {
    tokio::fs::write(partial, body).await.at_path(partial)?;
    tokio::fs::rename(partial, path).await.at_path(path)
}
