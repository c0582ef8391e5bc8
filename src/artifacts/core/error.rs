//! Error taxonomy shared by every repository operation
//!
//! Operations return `anyhow::Result` and carry one of these values at the root of
//! the error chain, so callers can branch on the failure kind with
//! `err.downcast_ref::<OrbitError>()`.

use crate::artifacts::sync::SyncReport;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum OrbitError {
    /// A source file (on `add`) does not exist
    #[error("file not found: {}", .path.display())]
    FileNotFound { path: PathBuf },

    /// A local filesystem operation failed
    #[error("i/o failure at {}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The remote object store was unreachable, timed out, or rejected a request
    #[error("remote request for '{key}' failed: {reason}")]
    Network { key: String, reason: String },

    /// The local repository configuration lacks a required value
    #[error("missing configuration: {what}")]
    ConfigMissing { what: String },

    #[error("commit {id} not found")]
    CommitNotFound { id: String },

    /// A push or pull stopped at its first failed object
    #[error("{operation} stopped after {} transferred objects", .report.transferred())]
    Sync {
        operation: String,
        report: SyncReport,
        #[source]
        source: Box<OrbitError>,
    },
}

impl OrbitError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        OrbitError::Io {
            path: path.into(),
            source,
        }
    }

    pub fn network(key: impl Into<String>, reason: impl ToString) -> Self {
        OrbitError::Network {
            key: key.into(),
            reason: reason.to_string(),
        }
    }

    pub fn config_missing(what: impl Into<String>) -> Self {
        OrbitError::ConfigMissing { what: what.into() }
    }

    pub fn sync(operation: impl Into<String>, report: SyncReport, source: OrbitError) -> Self {
        OrbitError::Sync {
            operation: operation.into(),
            report,
            source: Box::new(source),
        }
    }
}

/// Attach the attempted path to a raw `std::io::Error`
pub trait IoResultExt<T> {
    fn at_path(self, path: &Path) -> Result<T, OrbitError>;
}

impl<T> IoResultExt<T> for std::io::Result<T> {
    fn at_path(self, path: &Path) -> Result<T, OrbitError> {
        self.map_err(|source| OrbitError::io(path, source))
    }
}
