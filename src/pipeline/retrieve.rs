use std::sync::Arc;

use thiserror::Error;

use super::ident;
use super::validator::base_name;
use crate::blob_store::{BlobStore, BlobStoreError};
use crate::storage::{FileRecord, MetadataIndex};

#[derive(Debug, Error)]
pub enum RetrievalError {
    #[error("Invalid file ID")]
    InvalidId,
    #[error("File not found")]
    NotFound,
    #[error("Access denied")]
    AccessDenied,
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<BlobStoreError> for RetrievalError {
    fn from(e: BlobStoreError) -> Self {
        match e {
            BlobStoreError::NotFound(_) => RetrievalError::NotFound,
            BlobStoreError::AccessDenied(_) | BlobStoreError::InvalidKey(_) => {
                RetrievalError::AccessDenied
            }
            BlobStoreError::Io(e) => RetrievalError::Io(e),
        }
    }
}

/// An opened blob together with its metadata.
#[derive(Debug)]
pub struct FileContent {
    pub record: FileRecord,
    pub file: tokio::fs::File,
    /// Length of the blob on disk
    pub len: u64,
}

impl FileContent {
    /// `Content-Disposition` value that makes clients save the file under its
    /// original (sanitized) name.
    pub fn content_disposition(&self) -> String {
        format!(
            "attachment; filename=\"{}\"",
            sanitize_download_name(&self.record.original_name)
        )
    }
}

/// Read-only access to stored files.
#[derive(Clone)]
pub struct RetrievalPipeline {
    index: MetadataIndex,
    store: Arc<dyn BlobStore>,
}

impl RetrievalPipeline {
    pub fn new(index: MetadataIndex, store: Arc<dyn BlobStore>) -> Self {
        Self { index, store }
    }

    pub async fn get_metadata(&self, id: &str) -> Result<FileRecord, RetrievalError> {
        let id = normalize_id(id)?;
        self.index.get(&id).ok_or(RetrievalError::NotFound)
    }

    /// Look up and open a file.
    ///
    /// The blob store check always runs, even though the index implies the
    /// blob exists; the store is authoritative.
    pub async fn get_content(&self, id: &str) -> Result<FileContent, RetrievalError> {
        let id = normalize_id(id)?;
        let record = self.index.get(&id).ok_or(RetrievalError::NotFound)?;

        let path = self.store.resolve_readable_path(&id).await?;
        let file = match tokio::fs::File::open(&path).await {
            Ok(file) => file,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(RetrievalError::NotFound);
            }
            Err(e) => return Err(e.into()),
        };
        let len = file.metadata().await?.len();

        Ok(FileContent { record, file, len })
    }
}

/// Syntax gate applied before any lookup.
fn normalize_id(id: &str) -> Result<String, RetrievalError> {
    if !ident::is_valid_id(id) {
        return Err(RetrievalError::InvalidId);
    }
    Ok(id.to_ascii_lowercase())
}

/// Make a stored filename safe to embed in a quoted header parameter.
///
/// Strips directory components, control characters and quotes.
pub fn sanitize_download_name(name: &str) -> String {
    let cleaned: String = base_name(name)
        .rsplit('\\')
        .next()
        .unwrap_or_default()
        .chars()
        .filter(|c| !c.is_control() && *c != '"' && *c != '\'')
        .collect();

    if cleaned.trim().is_empty() {
        "download".to_string()
    } else {
        cleaned
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_download_name() {
        assert_eq!(sanitize_download_name("report.pdf"), "report.pdf");
        assert_eq!(sanitize_download_name("a/b/report.pdf"), "report.pdf");
        assert_eq!(sanitize_download_name("C:\\docs\\report.pdf"), "report.pdf");
        assert_eq!(
            sanitize_download_name("evil\"; x=\"y.txt"),
            "evil; x=y.txt"
        );
        assert_eq!(sanitize_download_name("it's.txt"), "its.txt");
        assert_eq!(
            sanitize_download_name("line\r\nSet-Cookie: a=b.txt"),
            "lineSet-Cookie: a=b.txt"
        );
        assert_eq!(sanitize_download_name("tab\there\u{7f}.txt"), "tabhere.txt");
        assert_eq!(sanitize_download_name("\"\""), "download");
    }

    #[test]
    fn test_normalize_id() {
        assert!(matches!(
            normalize_id("not-a-valid-id"),
            Err(RetrievalError::InvalidId)
        ));
        assert_eq!(
            normalize_id("ABCDEF0123456789ABCDEF0123456789").unwrap(),
            "abcdef0123456789abcdef0123456789"
        );
    }
}
