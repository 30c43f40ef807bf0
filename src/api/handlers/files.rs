use axum::extract::multipart::{MultipartError, MultipartRejection};
use axum::extract::{Multipart, Path, State};
use axum::http::StatusCode;
use axum::Json;
use std::sync::Arc;

use super::{ingest_error, retrieval_error};
use crate::api::response::{ApiError, FileInfoResponse, UploadResponse};
use crate::pipeline::validator::format_size;
use crate::pipeline::UploadCandidate;
use crate::AppState;

/// Multipart field carrying the uploaded files
const FILES_FIELD: &str = "files";

// ============================================================================
// Handlers
// ============================================================================

/// Route: POST /upload and POST /api/upload
pub async fn upload_files(
    State(state): State<Arc<AppState>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<UploadResponse>, ApiError> {
    let mut multipart = multipart.map_err(|e| {
        ApiError::bad_request(format!("Invalid multipart request: {}", e.body_text()))
    })?;
    let max_size = state.config.max_upload_size;

    let mut batch = Vec::new();
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| multipart_error(e, max_size))?
    {
        if field.name() != Some(FILES_FIELD) {
            continue;
        }
        let Some(filename) = field.file_name().map(|s| s.to_string()) else {
            tracing::debug!("Ignoring files part without a filename");
            continue;
        };
        let mime_type = field.content_type().unwrap_or_default().to_string();

        let data = field
            .bytes()
            .await
            .map_err(|e| multipart_error(e, max_size))?;

        batch.push(UploadCandidate::new(filename, mime_type, data));
    }

    if batch.is_empty() {
        return Err(ApiError::bad_request("No files to upload"));
    }

    let records = state.ingest.ingest(batch).await.map_err(ingest_error)?;

    tracing::info!(files = records.len(), "Upload completed");
    Ok(UploadResponse::success(records))
}

/// Route: GET /info/:id (plain-text errors)
pub async fn file_info(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<FileInfoResponse>, ApiError> {
    lookup(&state, &id).await.map_err(ApiError::into_text)
}

/// Route: GET /api/info/:id (JSON errors)
pub async fn api_file_info(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<FileInfoResponse>, ApiError> {
    lookup(&state, &id).await
}

// ============================================================================
// Helpers
// ============================================================================

async fn lookup(state: &AppState, id: &str) -> Result<Json<FileInfoResponse>, ApiError> {
    let file = state
        .retrieval
        .get_metadata(id)
        .await
        .map_err(retrieval_error)?;

    Ok(FileInfoResponse::success(file))
}

fn multipart_error(e: MultipartError, max_size: u64) -> ApiError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        ApiError::bad_request(format!(
            "File size too large (max {})",
            format_size(&max_size)
        ))
    } else {
        ApiError::bad_request(format!("Invalid multipart data: {}", e.body_text()))
    }
}
