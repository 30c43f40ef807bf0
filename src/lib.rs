//! file-share - A minimal file-sharing service
//!
//! Clients upload files over HTTP and get back an opaque identifier that can
//! later be used to download the file or read its metadata:
//! - Upload validation by size, filename, extension and declared media type
//! - Blobs stored on the local filesystem, one file per identifier
//! - In-memory metadata index (not persisted across restarts)
//! - REST API with multipart upload support

pub mod api;
pub mod blob_store;
pub mod config;
pub mod pipeline;
pub mod storage;
#[cfg(test)]
pub mod testutil;

use std::sync::Arc;

use blob_store::BlobStore;
use config::Config;
use pipeline::{IngestPipeline, RetrievalPipeline, UploadPolicy};
use storage::MetadataIndex;

/// Shared application state
pub struct AppState {
    pub config: Config,
    pub ingest: IngestPipeline,
    pub retrieval: RetrievalPipeline,
}

impl AppState {
    /// Wire both pipelines to one metadata index and one blob store.
    pub fn new(config: Config, index: MetadataIndex, blob_store: Arc<dyn BlobStore>) -> Self {
        let policy = UploadPolicy::new(config.max_upload_size);
        Self {
            ingest: IngestPipeline::new(policy, index.clone(), Arc::clone(&blob_store)),
            retrieval: RetrievalPipeline::new(index, blob_store),
            config,
        }
    }
}
