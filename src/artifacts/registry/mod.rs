//! Repository registration with the hosting service
//!
//! `init` announces a new repository to an external registry so it shows up next
//! to repositories created through the web interface. Registration is
//! best-effort: the caller turns any failure into a warning.

use async_trait::async_trait;
use colored::Colorize;
use serde::Serialize;
use std::time::Duration;

const DEFAULT_REGISTRY_URL: &str = "http://localhost:3000";
const CREATE_REPOSITORY_PATH: &str = "/repo/create";
const REGISTRY_TIMEOUT: Duration = Duration::from_secs(5);
pub const DEFAULT_OWNER: &str = "cli-user";

/// JSON payload accepted by the registry's create endpoint
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RepositoryDescriptor {
    pub name: String,
    pub description: String,
    pub visibility: bool,
    pub owner: String,
    pub content: Vec<serde_json::Value>,
    pub issues: Vec<serde_json::Value>,
}

impl RepositoryDescriptor {
    /// Descriptor for a repository created from the command line
    pub fn from_cli(name: &str, owner: Option<&str>) -> Self {
        RepositoryDescriptor {
            name: name.to_string(),
            description: "CLI created repo".to_string(),
            visibility: true,
            owner: owner.unwrap_or(DEFAULT_OWNER).to_string(),
            content: Vec::new(),
            issues: Vec::new(),
        }
    }
}

#[async_trait]
pub trait RepositoryRegistry: Send + Sync {
    async fn register_repository(&self, descriptor: &RepositoryDescriptor) -> anyhow::Result<()>;
}

/// Registry reached over HTTP; success is a `201 Created`
pub struct HttpRegistry {
    client: reqwest::Client,
    base_url: String,
}

impl HttpRegistry {
    pub fn new(base_url: impl Into<String>) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder().timeout(REGISTRY_TIMEOUT).build()?;

        Ok(HttpRegistry {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn endpoint(&self) -> String {
        format!("{}{}", self.base_url, CREATE_REPOSITORY_PATH)
    }
}

#[async_trait]
impl RepositoryRegistry for HttpRegistry {
    async fn register_repository(&self, descriptor: &RepositoryDescriptor) -> anyhow::Result<()> {
        let endpoint = self.endpoint();
        tracing::debug!(%endpoint, name = %descriptor.name, "registering repository");

        let response = self.client.post(&endpoint).json(descriptor).send().await?;
        let status = response.status();
        if status != reqwest::StatusCode::CREATED {
            anyhow::bail!("registry at {} answered {}", endpoint, status);
        }

        Ok(())
    }
}

/// Registry used when registration is switched off
pub struct NoopRegistry;

#[async_trait]
impl RepositoryRegistry for NoopRegistry {
    async fn register_repository(&self, descriptor: &RepositoryDescriptor) -> anyhow::Result<()> {
        tracing::debug!(name = %descriptor.name, "repository registration disabled");
        Ok(())
    }
}

/// Pick the registry from `ORBIT_REGISTRY_URL`
///
/// Unset means the default local service; an empty value disables registration.
/// A registry that cannot be built is replaced by `NoopRegistry` with a warning,
/// so `init` still sets up the local repository.
pub fn registry_from_env() -> Box<dyn RepositoryRegistry> {
    let url = std::env::var("ORBIT_REGISTRY_URL").ok();
    registry_or_noop(registry_for(url.as_deref()))
}

fn registry_for(url: Option<&str>) -> anyhow::Result<Box<dyn RepositoryRegistry>> {
    match url.map(str::trim) {
        Some("") => Ok(Box::new(NoopRegistry)),
        Some(url) => Ok(Box::new(HttpRegistry::new(url)?)),
        None => Ok(Box::new(HttpRegistry::new(DEFAULT_REGISTRY_URL)?)),
    }
}

fn registry_or_noop(
    built: anyhow::Result<Box<dyn RepositoryRegistry>>,
) -> Box<dyn RepositoryRegistry> {
    built.unwrap_or_else(|e| {
        tracing::warn!("registry client unavailable: {:#}", e);
        eprintln!(
            "{} repository registration skipped: {:#}",
            "warning:".yellow(),
            e
        );
        Box::new(NoopRegistry)
    })
}
