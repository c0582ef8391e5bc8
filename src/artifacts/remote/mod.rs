//! Remote object storage
//!
//! Commits are mirrored into a flat key-value store. The only structure is the
//! key itself:
//!
//! ```text
//! <repo-name>/commits/<commit-id>/<file-name>
//! ```
//!
//! Any backend that can put, get and list keys by prefix can hold a repository:
//!
//! - `s3_store`: an S3 bucket (the production backend)
//! - `fs_store`: a local directory, handy for mirrors and end-to-end tests
//! - `memory_store`: an in-process map used by unit tests

pub mod fs_store;
pub mod key;
pub mod memory_store;
pub mod s3_store;
pub mod settings;

use crate::artifacts::core::error::OrbitError;
use async_trait::async_trait;
use bytes::Bytes;

#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Store `body` under `key`, replacing any existing object
    async fn put(&self, key: &str, body: Bytes) -> Result<(), OrbitError>;

    /// Fetch the object stored under `key`; a missing key is an error
    async fn get(&self, key: &str) -> Result<Bytes, OrbitError>;

    /// Every key starting with `prefix`, sorted
    async fn list_keys_with_prefix(&self, prefix: &str) -> Result<Vec<String>, OrbitError>;

    /// Human-readable location used in log lines
    fn describe(&self) -> String;
}
