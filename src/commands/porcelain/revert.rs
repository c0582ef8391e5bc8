use crate::areas::layout::ensure_dir;
use crate::areas::repository::Repository;
use crate::artifacts::core::error::{IoResultExt, OrbitError};
use crate::artifacts::objects::commit_id::CommitId;
use crate::artifacts::remote::ObjectStore;
use std::io::Write;
use std::path::PathBuf;

/// Where `revert` writes the files of a commit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RevertTarget {
    /// The repository root, i.e. the invocation directory
    #[default]
    WorkingTree,
    Staging,
}

impl Repository {
    /// Copy the files recorded in a commit back into `target`
    ///
    /// Same-name files are overwritten, other files are left alone. A commit counts
    /// as present once its `commit.json` is written; when it is not and `remote` is
    /// given, the repository is pulled first.
    pub async fn revert(
        &mut self,
        commit_id: &str,
        target: RevertTarget,
        remote: Option<&dyn ObjectStore>,
    ) -> anyhow::Result<usize> {
        let not_found = || OrbitError::CommitNotFound {
            id: commit_id.to_string(),
        };
        let commit_id = CommitId::try_parse(commit_id).map_err(|_| not_found())?;

        if !self.commits().is_complete(&commit_id) {
            match remote {
                Some(store) => {
                    tracing::info!(commit = %commit_id, "commit missing locally, pulling first");
                    self.pull(store).await?;
                    if !self.commits().is_complete(&commit_id) {
                        return Err(not_found().into());
                    }
                }
                None => return Err(not_found().into()),
            }
        }

        let destination = self.revert_destination(target)?;
        let files = self.commits().snapshot_files(&commit_id)?;
        let commit_path = self.commits().commit_path(&commit_id);
        for file_name in &files {
            let source = commit_path.join(file_name);
            tokio::fs::copy(&source, destination.join(file_name))
                .await
                .at_path(&source)?;
        }

        writeln!(
            self.writer(),
            "Reverted to commit {} ({} files restored to {}).",
            commit_id,
            files.len(),
            destination.display()
        )?;
        tracing::info!(commit = %commit_id, files = files.len(), ?target, "commit reverted");

        Ok(files.len())
    }

    fn revert_destination(&self, target: RevertTarget) -> Result<PathBuf, OrbitError> {
        match target {
            RevertTarget::WorkingTree => Ok(self.path().to_path_buf()),
            RevertTarget::Staging => ensure_dir(self.staging().path()),
        }
    }
}
