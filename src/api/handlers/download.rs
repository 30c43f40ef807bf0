use axum::body::Body;
use axum::extract::{Path, State};
use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use std::sync::Arc;
use tokio_util::io::ReaderStream;

use super::retrieval_error;
use crate::api::response::ApiError;
use crate::AppState;

/// Stream a stored file as an attachment.
/// Route: GET /download/:id
pub async fn download_file(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Response, ApiError> {
    let content = state
        .retrieval
        .get_content(&id)
        .await
        .map_err(|e| retrieval_error(e).into_text())?;

    let disposition = content.content_disposition();
    let mime_type = content.record.mime_type.clone();
    let len = content.len;

    let body = Body::from_stream(ReaderStream::new(content.file));
    let mut response = (StatusCode::OK, body).into_response();
    let headers = response.headers_mut();

    headers.insert(
        header::CONTENT_TYPE,
        mime_type
            .parse()
            .unwrap_or(HeaderValue::from_static("application/octet-stream")),
    );

    headers.insert(header::CONTENT_LENGTH, HeaderValue::from(len));

    headers.insert(
        header::CONTENT_DISPOSITION,
        disposition
            .parse()
            .unwrap_or(HeaderValue::from_static("attachment")),
    );

    headers.insert(
        header::X_CONTENT_TYPE_OPTIONS,
        HeaderValue::from_static("nosniff"),
    );

    tracing::debug!(file_id = %content.record.id, size = len, "Serving file");
    Ok(response)
}
