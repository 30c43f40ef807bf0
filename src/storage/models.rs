use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Metadata for one stored upload.
///
/// Records are built once by the ingestion pipeline and never change afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileRecord {
    /// 32 lowercase hex characters; also the blob's file name on disk
    pub id: String,
    /// Client filename with any directory component stripped
    pub original_name: String,
    /// Byte length as reported at upload time
    pub size: u64,
    pub upload_time: DateTime<Utc>,
    /// Client-declared content type, not checked against the bytes
    pub mime_type: String,
}
