//! In-memory object store
//!
//! Holds objects in a sorted map. Writes or reads can be made to fail for keys
//! containing a given fragment, so the abort paths of push and pull are deterministic.

use crate::artifacts::core::error::OrbitError;
use crate::artifacts::remote::ObjectStore;
use async_trait::async_trait;
use bytes::Bytes;
use std::collections::BTreeMap;
use std::sync::Mutex;

#[derive(Debug, Default)]
pub struct MemoryObjectStore {
    objects: Mutex<BTreeMap<String, Bytes>>,
    failing_fragment: Mutex<Option<String>>,
    failing_get_fragment: Mutex<Option<String>>,
}

impl MemoryObjectStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reject every `put` whose key contains `fragment`
    pub fn fail_puts_matching(&self, fragment: impl Into<String>) {
        if let Ok(mut failing) = self.failing_fragment.lock() {
            *failing = Some(fragment.into());
        }
    }

    /// Reject every `get` whose key contains `fragment`
    pub fn fail_gets_matching(&self, fragment: impl Into<String>) {
        if let Ok(mut failing) = self.failing_get_fragment.lock() {
            *failing = Some(fragment.into());
        }
    }

    /// Snapshot of all stored objects
    pub fn objects(&self) -> BTreeMap<String, Bytes> {
        self.objects
            .lock()
            .map(|objects| objects.clone())
            .unwrap_or_default()
    }

    fn matches(fragment: &Mutex<Option<String>>, key: &str) -> bool {
        fragment
            .lock()
            .map(|failing| failing.as_ref().is_some_and(|fragment| key.contains(fragment)))
            .unwrap_or(false)
    }

    fn lock_objects(
        &self,
        key: &str,
    ) -> Result<std::sync::MutexGuard<'_, BTreeMap<String, Bytes>>, OrbitError> {
        self.objects
            .lock()
            .map_err(|_| OrbitError::network(key, "in-memory store lock poisoned"))
    }
}

#[async_trait]
impl ObjectStore for MemoryObjectStore {
    async fn put(&self, key: &str, body: Bytes) -> Result<(), OrbitError> {
        if Self::matches(&self.failing_fragment, key) {
            return Err(OrbitError::network(key, "upload rejected"));
        }

        self.lock_objects(key)?.insert(key.to_string(), body);
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Bytes, OrbitError> {
        if Self::matches(&self.failing_get_fragment, key) {
            return Err(OrbitError::network(key, "download failed"));
        }

        self.lock_objects(key)?
            .get(key)
            .cloned()
            .ok_or_else(|| OrbitError::network(key, "no such key"))
    }

    async fn list_keys_with_prefix(&self, prefix: &str) -> Result<Vec<String>, OrbitError> {
        Ok(self
            .lock_objects(prefix)?
            .keys()
            .filter(|key| key.starts_with(prefix))
            .cloned()
            .collect())
    }

    fn describe(&self) -> String {
        "memory://".to_string()
    }
}
