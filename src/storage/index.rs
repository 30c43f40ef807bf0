use std::sync::Arc;

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;

use super::models::FileRecord;

/// In-memory identifier -> [`FileRecord`] mapping.
///
/// Cloning yields another handle to the same map, so one index can be shared
/// between the ingestion and retrieval pipelines. Records are inserted fully
/// built; a reader sees either nothing or the whole record.
#[derive(Debug, Clone, Default)]
pub struct MetadataIndex {
    records: Arc<DashMap<String, FileRecord>>,
}

impl MetadataIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a record if its id is vacant.
    ///
    /// Returns `false` and leaves the existing record untouched when the id is
    /// already present, since ids are never reused.
    pub fn put(&self, record: FileRecord) -> bool {
        match self.records.entry(record.id.clone()) {
            Entry::Occupied(_) => false,
            Entry::Vacant(vacant) => {
                vacant.insert(record);
                true
            }
        }
    }

    pub fn get(&self, id: &str) -> Option<FileRecord> {
        self.records.get(id).map(|entry| entry.value().clone())
    }

    pub fn contains(&self, id: &str) -> bool {
        self.records.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
