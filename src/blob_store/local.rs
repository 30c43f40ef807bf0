use async_trait::async_trait;
use bytes::Bytes;
use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};
use tokio::io::AsyncWriteExt;

use super::{BlobStore, BlobStoreError};

/// Blob store over a single local content directory.
#[derive(Debug, Clone)]
pub struct LocalStore {
    /// Canonical form of the content directory
    base_path: PathBuf,
}

impl LocalStore {
    /// Open a store rooted at `base_path`, creating the directory if needed.
    pub fn new<P: AsRef<Path>>(base_path: P) -> Result<Self, std::io::Error> {
        std::fs::create_dir_all(base_path.as_ref())?;
        let base_path = std::fs::canonicalize(base_path.as_ref())?;
        Ok(Self { base_path })
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    /// Join `key` onto the content directory, only if it is a single plain name.
    fn blob_path(&self, key: &str) -> Option<PathBuf> {
        let mut components = Path::new(key).components();
        match (components.next(), components.next()) {
            (Some(Component::Normal(name)), None) => Some(self.base_path.join(name)),
            _ => None,
        }
    }
}

#[async_trait]
impl BlobStore for LocalStore {
    async fn write(&self, id: &str, data: Bytes) -> Result<u64, BlobStoreError> {
        let path = self
            .blob_path(id)
            .ok_or_else(|| BlobStoreError::InvalidKey(id.to_string()))?;

        let mut file = tokio::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .await?;
        file.write_all(&data).await?;
        file.flush().await?;

        Ok(data.len() as u64)
    }

    async fn resolve_readable_path(&self, id: &str) -> Result<PathBuf, BlobStoreError> {
        let path = self
            .blob_path(id)
            .ok_or_else(|| BlobStoreError::AccessDenied(id.to_string()))?;

        let canonical = match tokio::fs::canonicalize(&path).await {
            Ok(p) => p,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(BlobStoreError::NotFound(id.to_string()));
            }
            Err(e) => return Err(e.into()),
        };

        // Component-wise prefix check; symlinks are already resolved
        if !canonical.starts_with(&self.base_path) {
            return Err(BlobStoreError::AccessDenied(id.to_string()));
        }

        let metadata = tokio::fs::metadata(&canonical).await?;
        if !metadata.is_file() {
            return Err(BlobStoreError::NotFound(id.to_string()));
        }

        Ok(canonical)
    }
}
