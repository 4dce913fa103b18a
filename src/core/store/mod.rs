//! Object store adapter.
//!
//! Capability interface for reading/writing named blobs and listing
//! names under a prefix, inside named containers. Paths are
//! slash-delimited (`place/department/filename`); prefix listings
//! treat `/` segments as directory boundaries.
//!
//! Two backends: filesystem (production) and in-memory (tests and
//! the `memory` config backend). No retry/backoff lives at this
//! seam; callers accumulate per-item failures instead of aborting
//! batches.

mod fs;
mod memory;

pub use fs::FsObjectStore;
pub use memory::MemoryObjectStore;

use async_trait::async_trait;

use crate::core::error::Result;

/// Capability interface over a container/blob object store
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Whether a blob exists at `path` in `container`
    async fn exists(&self, container: &str, path: &str) -> Result<bool>;

    /// Read a blob as UTF-8 text; `BlobNotFound` on miss
    async fn read_text(&self, container: &str, path: &str) -> Result<String>;

    /// Read a blob's raw bytes; `BlobNotFound` on miss
    async fn read_bytes(&self, container: &str, path: &str) -> Result<Vec<u8>>;

    /// Write text to `path`, overwriting any existing blob
    async fn write_text(&self, container: &str, path: &str, text: &str) -> Result<()>;

    /// List blob paths under `prefix`, lexicographically ordered
    async fn list_names(&self, container: &str, prefix: &str) -> Result<Vec<String>>;

    /// Create `container` if missing; already-exists is not an error
    async fn ensure_container(&self, container: &str) -> Result<()>;
}
