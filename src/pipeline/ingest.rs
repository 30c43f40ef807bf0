use std::sync::Arc;

use bytes::Bytes;
use chrono::Utc;
use thiserror::Error;

use super::ident;
use super::validator::{base_name, UploadPolicy, ValidationError};
use crate::blob_store::{BlobStore, BlobStoreError};
use crate::storage::{FileRecord, MetadataIndex};

#[derive(Debug, Error)]
pub enum IngestError {
    #[error(transparent)]
    Rejected(#[from] ValidationError),
    #[error("Failed to store file: {0}")]
    Storage(#[from] BlobStoreError),
    #[error("Identifier already in use: {0}")]
    Collision(String),
}

/// One file of a multipart batch, as received from the client.
#[derive(Debug, Clone)]
pub struct UploadCandidate {
    pub filename: String,
    pub mime_type: String,
    pub data: Bytes,
}

impl UploadCandidate {
    pub fn new(
        filename: impl Into<String>,
        mime_type: impl Into<String>,
        data: impl Into<Bytes>,
    ) -> Self {
        Self {
            filename: filename.into(),
            mime_type: mime_type.into(),
            data: data.into(),
        }
    }

    pub fn declared_size(&self) -> u64 {
        self.data.len() as u64
    }
}

/// Validates uploads and records them in the blob store and metadata index.
///
/// Each file is written in two steps, blob first and index second. The pair is
/// not atomic: a crash or a failed index insert between the two leaves an
/// orphaned blob, and a failure in the middle of a batch leaves the earlier
/// files of that batch stored. Nothing is rolled back.
#[derive(Clone)]
pub struct IngestPipeline {
    policy: UploadPolicy,
    index: MetadataIndex,
    store: Arc<dyn BlobStore>,
}

impl IngestPipeline {
    pub fn new(policy: UploadPolicy, index: MetadataIndex, store: Arc<dyn BlobStore>) -> Self {
        Self {
            policy,
            index,
            store,
        }
    }

    /// Store every file of `batch` in order, returning one record per file.
    ///
    /// Stops at the first file that fails validation or storage and returns
    /// that failure.
    pub async fn ingest(
        &self,
        batch: Vec<UploadCandidate>,
    ) -> Result<Vec<FileRecord>, IngestError> {
        let mut records = Vec::with_capacity(batch.len());
        for (position, candidate) in batch.into_iter().enumerate() {
            match self.ingest_one(candidate).await {
                Ok(record) => records.push(record),
                Err(e) => {
                    if records.is_empty() {
                        tracing::debug!(position, error = %e, "Upload batch rejected");
                    } else {
                        tracing::warn!(
                            position,
                            stored = records.len(),
                            error = %e,
                            "Upload batch aborted after storing earlier files"
                        );
                    }
                    return Err(e);
                }
            }
        }
        Ok(records)
    }

    /// Validate and store a single file.
    pub async fn ingest_one(&self, candidate: UploadCandidate) -> Result<FileRecord, IngestError> {
        let size = candidate.declared_size();
        self.policy
            .validate(&candidate.filename, size, &candidate.mime_type)?;

        let original_name = base_name(&candidate.filename).to_string();
        let id = ident::generate(&original_name);

        let written = self.store.write(&id, candidate.data).await?;
        debug_assert_eq!(written, size);

        let record = FileRecord {
            id: id.clone(),
            original_name,
            size,
            upload_time: Utc::now(),
            mime_type: candidate.mime_type,
        };

        if !self.index.put(record.clone()) {
            return Err(IngestError::Collision(id));
        }

        tracing::debug!(file_id = %id, size, "Stored file");
        Ok(record)
    }
}
