//! In-memory object store backend.
//!
//! Backs the `memory` storage backend and the test suites. Blobs
//! live in a locked map keyed by container and path; containers are
//! tracked so `ensure_container` stays idempotent like the real
//! thing.

use std::collections::{BTreeMap, HashSet};
use std::sync::Mutex;

use async_trait::async_trait;

use crate::core::error::{GavelError, Result};
use crate::core::store::ObjectStore;

#[derive(Default)]
struct MemoryInner {
    blobs: BTreeMap<(String, String), Vec<u8>>,
    containers: HashSet<String>,
}

/// Object store held entirely in process memory
#[derive(Default)]
pub struct MemoryObjectStore {
    inner: Mutex<MemoryInner>,
}

impl MemoryObjectStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a raw blob; test convenience
    pub fn put_bytes(&self, container: &str, path: &str, bytes: Vec<u8>) {
        let mut inner = self.inner.lock().expect("store lock poisoned");
        inner.containers.insert(container.to_string());
        inner
            .blobs
            .insert((container.to_string(), path.to_string()), bytes);
    }
}

#[async_trait]
impl ObjectStore for MemoryObjectStore {
    async fn exists(&self, container: &str, path: &str) -> Result<bool> {
        let inner = self.inner.lock().expect("store lock poisoned");
        Ok(inner
            .blobs
            .contains_key(&(container.to_string(), path.to_string())))
    }

    async fn read_text(&self, container: &str, path: &str) -> Result<String> {
        let bytes = self.read_bytes(container, path).await?;
        String::from_utf8(bytes)
            .map_err(|e| GavelError::Store(format!("Blob {container}/{path} is not UTF-8: {e}")))
    }

    async fn read_bytes(&self, container: &str, path: &str) -> Result<Vec<u8>> {
        let inner = self.inner.lock().expect("store lock poisoned");
        inner
            .blobs
            .get(&(container.to_string(), path.to_string()))
            .cloned()
            .ok_or_else(|| GavelError::BlobNotFound(format!("{container}/{path}")))
    }

    async fn write_text(&self, container: &str, path: &str, text: &str) -> Result<()> {
        let mut inner = self.inner.lock().expect("store lock poisoned");
        inner.containers.insert(container.to_string());
        inner.blobs.insert(
            (container.to_string(), path.to_string()),
            text.as_bytes().to_vec(),
        );
        Ok(())
    }

    async fn list_names(&self, container: &str, prefix: &str) -> Result<Vec<String>> {
        let inner = self.inner.lock().expect("store lock poisoned");
        // BTreeMap iteration gives lexicographic order for free.
        Ok(inner
            .blobs
            .keys()
            .filter(|(c, p)| c == container && p.starts_with(prefix))
            .map(|(_, p)| p.clone())
            .collect())
    }

    async fn ensure_container(&self, container: &str) -> Result<()> {
        let mut inner = self.inner.lock().expect("store lock poisoned");
        inner.containers.insert(container.to_string());
        Ok(())
    }
}
