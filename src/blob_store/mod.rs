mod local;

pub use local::LocalStore;

use std::path::PathBuf;

use async_trait::async_trait;
use bytes::Bytes;
use thiserror::Error;

/// Failures from a blob store. Messages name the key only, never a path.
#[derive(Debug, Error)]
pub enum BlobStoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Blob not found: {0}")]
    NotFound(String),
    #[error("Access denied for blob: {0}")]
    AccessDenied(String),
    #[error("Invalid blob key: {0}")]
    InvalidKey(String),
}

/// Storage for raw upload bytes, one blob per file identifier.
/// Blobs are meaningless without the metadata index.
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Create a new blob named `id` and copy `data` into it.
    ///
    /// Never overwrites an existing blob and never writes outside the content
    /// directory. Returns the number of bytes written. A failed write may leave
    /// a partial blob behind.
    async fn write(&self, id: &str, data: Bytes) -> Result<u64, BlobStoreError>;

    /// Resolve `id` to a canonical path that is guaranteed to lie inside the
    /// content directory and to name a regular file.
    async fn resolve_readable_path(&self, id: &str) -> Result<PathBuf, BlobStoreError>;
}
