use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::storage::FileRecord;

// ============================================================================
// Success envelopes
// ============================================================================

#[derive(Debug, Serialize, Deserialize)]
pub struct UploadResponse {
    pub message: String,
    pub files: Vec<FileRecord>,
}

impl UploadResponse {
    pub fn success(files: Vec<FileRecord>) -> Json<UploadResponse> {
        Json(UploadResponse {
            message: "Upload successful".to_string(),
            files,
        })
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct FileInfoResponse {
    pub file: FileRecord,
}

impl FileInfoResponse {
    pub fn success(file: FileRecord) -> Json<FileInfoResponse> {
        Json(FileInfoResponse { file })
    }
}

// ============================================================================
// Error envelope
// ============================================================================

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

// ============================================================================
// Unified error type for handlers
// ============================================================================

/// A handler error rendered either as `{"error": "..."}` or as plain text.
///
/// Messages are shown to clients as-is, so they must never carry filesystem
/// paths or internal error details.
#[derive(Debug)]
pub enum ApiError {
    Json(StatusCode, String),
    Text(StatusCode, String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Json(code, error) => (code, Json(ErrorBody { error })).into_response(),
            ApiError::Text(code, msg) => (code, msg).into_response(),
        }
    }
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        ApiError::Json(StatusCode::BAD_REQUEST, message.into())
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        ApiError::Json(StatusCode::FORBIDDEN, message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        ApiError::Json(StatusCode::NOT_FOUND, message.into())
    }

    pub fn internal(message: impl Into<String>) -> Self {
        ApiError::Json(StatusCode::INTERNAL_SERVER_ERROR, message.into())
    }

    /// Render the same error as a plain-text body.
    pub fn into_text(self) -> Self {
        match self {
            ApiError::Json(code, msg) | ApiError::Text(code, msg) => ApiError::Text(code, msg),
        }
    }
}
