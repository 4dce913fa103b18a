//! Filesystem object store backend.
//!
//! Containers map to first-level directories under the configured
//! root; blob paths map to nested files. Writes create parent
//! directories as needed and overwrite in place. Listings walk the
//! container directory and filter by raw path prefix, so a prefix
//! may end mid-filename (date-group prefixes rely on this).

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;
use walkdir::WalkDir;

use crate::core::error::{GavelError, Result};
use crate::core::store::ObjectStore;

/// Object store rooted at a local directory
pub struct FsObjectStore {
    root: PathBuf,
}

impl FsObjectStore {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    fn blob_path(&self, container: &str, path: &str) -> Result<PathBuf> {
        if path.split('/').any(|segment| segment.is_empty()) {
            return Err(GavelError::Store(format!(
                "Blob path has empty segment: {path}"
            )));
        }
        if path.split('/').any(|segment| segment == "." || segment == "..") {
            return Err(GavelError::Store(format!(
                "Blob path escapes container: {path}"
            )));
        }
        Ok(self.root.join(container).join(path))
    }

    fn map_read_err(container: &str, path: &str, e: std::io::Error) -> GavelError {
        if e.kind() == std::io::ErrorKind::NotFound {
            GavelError::BlobNotFound(format!("{container}/{path}"))
        } else {
            GavelError::Store(format!("Failed to read {container}/{path}: {e}"))
        }
    }
}

#[async_trait]
impl ObjectStore for FsObjectStore {
    async fn exists(&self, container: &str, path: &str) -> Result<bool> {
        let full = self.blob_path(container, path)?;
        Ok(fs::try_exists(&full).await.unwrap_or(false))
    }

    async fn read_text(&self, container: &str, path: &str) -> Result<String> {
        let bytes = self.read_bytes(container, path).await?;
        String::from_utf8(bytes)
            .map_err(|e| GavelError::Store(format!("Blob {container}/{path} is not UTF-8: {e}")))
    }

    async fn read_bytes(&self, container: &str, path: &str) -> Result<Vec<u8>> {
        let full = self.blob_path(container, path)?;
        fs::read(&full)
            .await
            .map_err(|e| Self::map_read_err(container, path, e))
    }

    async fn write_text(&self, container: &str, path: &str, text: &str) -> Result<()> {
        let full = self.blob_path(container, path)?;
        if let Some(parent) = full.parent() {
            fs::create_dir_all(parent).await.map_err(|e| {
                GavelError::Store(format!("Failed to create directories for {path}: {e}"))
            })?;
        }
        fs::write(&full, text)
            .await
            .map_err(|e| GavelError::Store(format!("Failed to write {container}/{path}: {e}")))
    }

    async fn list_names(&self, container: &str, prefix: &str) -> Result<Vec<String>> {
        let container_dir = self.root.join(container);
        if !fs::try_exists(&container_dir).await.unwrap_or(false) {
            return Ok(Vec::new());
        }

        let prefix = prefix.to_string();
        let names = tokio::task::spawn_blocking(move || walk_container(&container_dir, &prefix))
            .await
            .map_err(|e| GavelError::Store(format!("Listing task failed: {e}")))??;

        Ok(names)
    }

    async fn ensure_container(&self, container: &str) -> Result<()> {
        let dir = self.root.join(container);
        fs::create_dir_all(&dir)
            .await
            .map_err(|e| GavelError::Store(format!("Failed to create container {container}: {e}")))
    }
}

fn walk_container(container_dir: &Path, prefix: &str) -> Result<Vec<String>> {
    let mut names = Vec::new();

    for entry in WalkDir::new(container_dir).follow_links(false) {
        let entry =
            entry.map_err(|e| GavelError::Store(format!("Failed to walk container: {e}")))?;
        if !entry.file_type().is_file() {
            continue;
        }
        let relative = entry
            .path()
            .strip_prefix(container_dir)
            .map_err(|e| GavelError::Store(format!("Path outside container: {e}")))?;
        let name = relative.to_string_lossy().replace(std::path::MAIN_SEPARATOR, "/");
        if name.starts_with(prefix) {
            names.push(name);
        }
    }

    names.sort();
    Ok(names)
}
