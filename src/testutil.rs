//! Shared test helpers for file-share unit tests.

use std::path::PathBuf;
use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Method, Request};

use crate::blob_store::LocalStore;
use crate::config::{Config, ServerConfig, StorageConfig};
use crate::storage::MetadataIndex;
use crate::AppState;

/// Per-file upload cap used by test states.
pub const TEST_MAX_UPLOAD_SIZE: u64 = 64 * 1024;

const BOUNDARY: &str = "file-share-test-boundary";

/// Content directory used by [`test_state`] inside `temp_dir`.
pub fn files_dir(temp_dir: &tempfile::TempDir) -> PathBuf {
    temp_dir.path().join("files")
}

/// Create a test AppState with an empty index and a local blob store.
pub fn test_state(temp_dir: &tempfile::TempDir) -> Arc<AppState> {
    let files_dir = files_dir(temp_dir);

    let config = Config {
        server: ServerConfig {
            bind_address: "127.0.0.1:0".to_string(),
        },
        storage: StorageConfig {
            upload_dir: files_dir.to_string_lossy().to_string(),
        },
        max_upload_size: TEST_MAX_UPLOAD_SIZE,
    };

    let store = LocalStore::new(&files_dir).expect("Failed to create test blob store");

    Arc::new(AppState::new(config, MetadataIndex::new(), Arc::new(store)))
}

/// Build a multipart POST with one `files` part per `(filename, mime_type, data)`.
/// An empty mime type omits the part's Content-Type header.
pub fn upload_request(uri: &str, parts: &[(&str, &str, &[u8])]) -> Request<Body> {
    let mut body = Vec::new();
    for (filename, mime_type, data) in parts {
        body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
        body.extend_from_slice(
            format!("Content-Disposition: form-data; name=\"files\"; filename=\"{filename}\"\r\n")
                .as_bytes(),
        );
        if !mime_type.is_empty() {
            body.extend_from_slice(format!("Content-Type: {mime_type}\r\n").as_bytes());
        }
        body.extend_from_slice(b"\r\n");
        body.extend_from_slice(data);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());

    Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .expect("Failed to build upload request")
}

pub fn get_request(uri: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .body(Body::empty())
        .expect("Failed to build GET request")
}
