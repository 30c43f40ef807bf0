pub mod ident;
mod ingest;
mod retrieve;
pub mod validator;

pub use ingest::{IngestError, IngestPipeline, UploadCandidate};
pub use retrieve::{sanitize_download_name, FileContent, RetrievalError, RetrievalPipeline};
pub use validator::{UploadPolicy, ValidationError};
