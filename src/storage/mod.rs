pub mod index;
pub mod models;

pub use index::MetadataIndex;
pub use models::FileRecord;
