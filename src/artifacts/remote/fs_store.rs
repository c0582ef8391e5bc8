//! Directory-backed object store
//!
//! Each key maps onto a file below the store root, one directory level per `/`
//! separated segment. Listing walks the whole tree, which is fine for the
//! mirror-sized stores this backend is meant for.

use crate::artifacts::core::error::OrbitError;
use crate::artifacts::remote::ObjectStore;
use async_trait::async_trait;
use bytes::Bytes;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

#[derive(Debug, Clone)]
pub struct FsObjectStore {
    root: Box<Path>,
}

impl FsObjectStore {
    pub fn new(root: Box<Path>) -> Self {
        FsObjectStore { root }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn object_path(&self, key: &str) -> Result<PathBuf, OrbitError> {
        let segments = key.split('/').collect::<Vec<_>>();
        if segments
            .iter()
            .any(|segment| segment.is_empty() || *segment == "." || *segment == "..")
        {
            return Err(OrbitError::network(key, "invalid object key"));
        }

        Ok(segments
            .into_iter()
            .fold(self.root.to_path_buf(), |path, segment| path.join(segment)))
    }
}

#[async_trait]
impl ObjectStore for FsObjectStore {
    async fn put(&self, key: &str, body: Bytes) -> Result<(), OrbitError> {
        let path = self.object_path(key)?;

        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| OrbitError::network(key, e))?;
        }
        tokio::fs::write(&path, &body)
            .await
            .map_err(|e| OrbitError::network(key, e))?;

        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Bytes, OrbitError> {
        let path = self.object_path(key)?;

        match tokio::fs::read(&path).await {
            Ok(data) => Ok(Bytes::from(data)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(OrbitError::network(key, "no such key"))
            }
            Err(e) => Err(OrbitError::network(key, e)),
        }
    }

    async fn list_keys_with_prefix(&self, prefix: &str) -> Result<Vec<String>, OrbitError> {
        if !self.root.exists() {
            return Ok(Vec::new());
        }

        let mut keys = Vec::new();
        for entry in WalkDir::new(&self.root) {
            let entry = entry.map_err(|e| OrbitError::network(prefix, e))?;
            if !entry.file_type().is_file() {
                continue;
            }

            let Ok(relative) = entry.path().strip_prefix(&self.root) else {
                continue;
            };
            let key = relative
                .components()
                .map(|component| component.as_os_str().to_string_lossy())
                .collect::<Vec<_>>()
                .join("/");

            if key.starts_with(prefix) {
                keys.push(key);
            }
        }
        keys.sort();

        Ok(keys)
    }

    fn describe(&self) -> String {
        format!("dir://{}", self.root.display())
    }
}
