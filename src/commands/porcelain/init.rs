use crate::areas::config::RepoConfig;
use crate::areas::repository::Repository;
use crate::artifacts::registry::{RepositoryDescriptor, RepositoryRegistry};
use anyhow::Context;
use colored::Colorize;
use std::io::Write;

impl Repository {
    /// Create the repository layout and record its name
    ///
    /// Re-running `init` on an existing repository only rewrites the recorded name
    /// (and bucket, when `S3_BUCKET` is set); staged files and commits are kept.
    /// Registration with `registry` happens afterwards and can only warn.
    pub async fn init(
        &mut self,
        repo_name: &str,
        owner: Option<&str>,
        registry: &dyn RepositoryRegistry,
    ) -> anyhow::Result<()> {
        let repo_name = repo_name.trim();
        if repo_name.is_empty() {
            anyhow::bail!("Repository name is required. Use: init --name <repoName>");
        }

        let existing = RepoConfig::load(&self.layout().config_path())?;

        self.layout()
            .ensure_root()
            .context("Failed to create repository directory")?;
        self.layout()
            .ensure_commits_dir()
            .context("Failed to create commits directory")?;
        self.layout()
            .ensure_staging_dir()
            .context("Failed to create staging directory")?;

        let bucket = std::env::var("S3_BUCKET")
            .ok()
            .filter(|bucket| !bucket.trim().is_empty())
            .or_else(|| existing.as_ref().and_then(|config| config.bucket.clone()));
        RepoConfig::new(repo_name, bucket)
            .save(&self.layout().config_path())
            .context("Failed to write repository config")?;

        let verb = if existing.is_some() {
            "Reinitialized existing"
        } else {
            "Initialized empty"
        };
        writeln!(
            self.writer(),
            "{} GitOrbit repository '{}' in {}",
            verb,
            repo_name,
            self.layout().path().display()
        )?;
        tracing::info!(repo = repo_name, "repository initialized");

        let descriptor = RepositoryDescriptor::from_cli(repo_name, owner);
        match registry.register_repository(&descriptor).await {
            Ok(()) => tracing::info!(repo = repo_name, "repository registered"),
            Err(e) => {
                tracing::warn!(repo = repo_name, "registration failed: {:#}", e);
                eprintln!(
                    "{} local init succeeded, but registry registration failed: {:#}",
                    "warning:".yellow(),
                    e
                );
            }
        }

        Ok(())
    }
}
