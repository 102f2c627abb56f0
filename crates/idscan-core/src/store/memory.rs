//! In-memory record store.

use std::collections::HashMap;
use std::sync::RwLock;

use tracing::debug;

use super::{RecordStore, Result, TimeRange};
use crate::error::StoreError;
use crate::models::record::{DocumentRecord, RecordSummary, RecordUpdate};

/// Record store living for the lifetime of the process.
#[derive(Debug, Default)]
pub struct MemoryStore {
    records: RwLock<HashMap<String, DocumentRecord>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-filled with records.
    pub fn with_records(records: impl IntoIterator<Item = DocumentRecord>) -> Self {
        let records = records.into_iter().map(|r| (r.id.clone(), r)).collect();
        Self {
            records: RwLock::new(records),
        }
    }

    /// Number of stored records.
    pub fn len(&self) -> usize {
        self.records.read().map(|r| r.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Insert or overwrite a record.
    pub(crate) fn put(&self, record: DocumentRecord) -> Result<()> {
        let mut records = self.records.write().map_err(|_| StoreError::Poisoned)?;
        records.insert(record.id.clone(), record);
        Ok(())
    }

    /// All records, oldest first.
    pub fn snapshot(&self) -> Result<Vec<DocumentRecord>> {
        let records = self.records.read().map_err(|_| StoreError::Poisoned)?;
        let mut all: Vec<DocumentRecord> = records.values().cloned().collect();
        all.sort_by(|a, b| a.timestamp.cmp(&b.timestamp).then_with(|| a.id.cmp(&b.id)));
        Ok(all)
    }
}

impl RecordStore for MemoryStore {
    fn insert(&self, record: DocumentRecord) -> Result<()> {
        let mut records = self.records.write().map_err(|_| StoreError::Poisoned)?;
        if records.contains_key(&record.id) {
            return Err(StoreError::Duplicate(record.id));
        }
        debug!("Storing record {}", record.id);
        records.insert(record.id.clone(), record);
        Ok(())
    }

    fn get(&self, id: &str) -> Result<Option<DocumentRecord>> {
        let records = self.records.read().map_err(|_| StoreError::Poisoned)?;
        Ok(records.get(id).cloned())
    }

    fn list(&self, range: Option<TimeRange>) -> Result<Vec<RecordSummary>> {
        Ok(self
            .snapshot()?
            .iter()
            .filter(|r| range.is_none_or(|range| range.contains(&r.timestamp)))
            .map(DocumentRecord::summary)
            .collect())
    }

    fn update(&self, id: &str, update: &RecordUpdate) -> Result<Option<DocumentRecord>> {
        let mut records = self.records.write().map_err(|_| StoreError::Poisoned)?;
        let Some(record) = records.get_mut(id) else {
            return Ok(None);
        };
        if update.apply(&mut record.fields) {
            debug!("Updated fields of record {}", id);
        }
        Ok(Some(record.clone()))
    }

    fn delete(&self, id: &str) -> Result<bool> {
        let mut records = self.records.write().map_err(|_| StoreError::Poisoned)?;
        Ok(records.remove(id).is_some())
    }
}
