mod download;
mod files;
mod health;
mod page;

use crate::api::response::ApiError;
use crate::pipeline::{IngestError, RetrievalError};

pub use download::download_file;
pub use files::{api_file_info, file_info, upload_files};
pub use health::health;
pub use page::index;

/// Map an IngestError to an ApiError
fn ingest_error(e: IngestError) -> ApiError {
    match e {
        IngestError::Rejected(reason) => ApiError::bad_request(reason.to_string()),
        IngestError::Storage(_) | IngestError::Collision(_) => {
            tracing::error!(error = %e, "Failed to save uploaded file");
            ApiError::internal("Failed to save file")
        }
    }
}

/// Map a RetrievalError to an ApiError
fn retrieval_error(e: RetrievalError) -> ApiError {
    match e {
        RetrievalError::InvalidId => ApiError::bad_request("Invalid file ID"),
        RetrievalError::NotFound => ApiError::not_found("File not found"),
        RetrievalError::AccessDenied => {
            tracing::warn!("Blob path escaped the content directory");
            ApiError::forbidden("Access denied")
        }
        RetrievalError::Io(e) => {
            tracing::error!(error = %e, "Failed to read stored file");
            ApiError::internal("Failed to read file")
        }
    }
}
