//! Process-level remote settings
//!
//! Everything here is read from the environment (after `.env` has been loaded by
//! the binary):
//!
//! - `ORBIT_REMOTE_DIR`: use a directory as the remote store instead of S3
//! - `S3_BUCKET`: bucket used when `config.json` records none
//! - `AWS_REGION`: S3 region (default `ap-south-1`)
//! - `S3_ENDPOINT`: custom S3-compatible endpoint
//! - `ORBIT_WORKERS`: concurrent copies/transfers per operation (default 4)
//! - `ORBIT_TIMEOUT_SECS`: per-object remote timeout in seconds (default 30)

use crate::areas::config::RepoConfig;
use crate::artifacts::core::error::OrbitError;
use crate::artifacts::remote::ObjectStore;
use crate::artifacts::remote::fs_store::FsObjectStore;
use crate::artifacts::remote::s3_store::S3ObjectStore;
use std::env;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_WORKERS: usize = 4;
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
const DEFAULT_REGION: &str = "ap-south-1";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SyncSettings {
    /// Upper bound on concurrently running copies or transfers
    pub workers: usize,
    /// Deadline for a single remote call
    pub timeout: Duration,
}

impl Default for SyncSettings {
    fn default() -> Self {
        SyncSettings {
            workers: DEFAULT_WORKERS,
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl SyncSettings {
    pub fn from_env() -> Self {
        let workers = env::var("ORBIT_WORKERS")
            .ok()
            .and_then(|value| value.trim().parse::<usize>().ok())
            .unwrap_or(DEFAULT_WORKERS)
            .max(1);
        let timeout = env::var("ORBIT_TIMEOUT_SECS")
            .ok()
            .and_then(|value| value.trim().parse::<u64>().ok())
            .map(Duration::from_secs)
            .unwrap_or(DEFAULT_TIMEOUT);

        SyncSettings { workers, timeout }
    }
}

/// Where the remote copy of a repository lives
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemoteTarget {
    Directory(PathBuf),
    S3 {
        bucket: String,
        region: String,
        endpoint: Option<String>,
    },
}

impl RemoteTarget {
    pub fn resolve(config: &RepoConfig) -> Result<Self, OrbitError> {
        if let Some(dir) = non_empty_var("ORBIT_REMOTE_DIR") {
            return Ok(RemoteTarget::Directory(PathBuf::from(dir)));
        }

        let bucket = config
            .bucket()
            .map(str::to_string)
            .or_else(|| non_empty_var("S3_BUCKET"))
            .ok_or_else(|| {
                OrbitError::config_missing("no remote bucket; set S3_BUCKET or ORBIT_REMOTE_DIR")
            })?;

        Ok(RemoteTarget::S3 {
            bucket,
            region: non_empty_var("AWS_REGION").unwrap_or_else(|| DEFAULT_REGION.to_string()),
            endpoint: non_empty_var("S3_ENDPOINT"),
        })
    }

    pub async fn connect(self) -> Box<dyn ObjectStore> {
        match self {
            RemoteTarget::Directory(root) => Box::new(FsObjectStore::new(root.into_boxed_path())),
            RemoteTarget::S3 {
                bucket,
                region,
                endpoint,
            } => Box::new(S3ObjectStore::connect(bucket, region, endpoint).await),
        }
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}
