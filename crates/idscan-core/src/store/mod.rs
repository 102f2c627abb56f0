//! Record storage keyed by generated identifiers.

mod json;
mod memory;

pub use json::JsonFileStore;
pub use memory::MemoryStore;

use chrono::{DateTime, Days, NaiveDate, Utc};

use crate::error::StoreError;
use crate::models::record::{DocumentRecord, RecordSummary, RecordUpdate};

/// Result type for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;

/// Half-open time interval `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeRange {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl TimeRange {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self { start, end }
    }

    /// The 24 hours starting at midnight UTC of `date`.
    pub fn day(date: NaiveDate) -> Self {
        let start = date.and_time(chrono::NaiveTime::MIN).and_utc();
        let end = start
            .checked_add_days(Days::new(1))
            .unwrap_or(DateTime::<Utc>::MAX_UTC);
        Self { start, end }
    }

    pub fn contains(&self, instant: &DateTime<Utc>) -> bool {
        *instant >= self.start && *instant < self.end
    }
}

/// A store of uploaded document records.
pub trait RecordStore: Send + Sync {
    /// Store a new record.
    fn insert(&self, record: DocumentRecord) -> Result<()>;

    /// Look up a record by identifier.
    fn get(&self, id: &str) -> Result<Option<DocumentRecord>>;

    /// List records uploaded within `range` (all records when `None`),
    /// oldest first, without image bytes.
    fn list(&self, range: Option<TimeRange>) -> Result<Vec<RecordSummary>>;

    /// Merge an update into the stored fields. Returns the updated record,
    /// or `None` if no record has that identifier.
    fn update(&self, id: &str, update: &RecordUpdate) -> Result<Option<DocumentRecord>>;

    /// Remove a record. Returns whether a record was removed.
    fn delete(&self, id: &str) -> Result<bool>;
}

impl<T: RecordStore + ?Sized> RecordStore for Box<T> {
    fn insert(&self, record: DocumentRecord) -> Result<()> {
        (**self).insert(record)
    }

    fn get(&self, id: &str) -> Result<Option<DocumentRecord>> {
        (**self).get(id)
    }

    fn list(&self, range: Option<TimeRange>) -> Result<Vec<RecordSummary>> {
        (**self).list(range)
    }

    fn update(&self, id: &str, update: &RecordUpdate) -> Result<Option<DocumentRecord>> {
        (**self).update(id, update)
    }

    fn delete(&self, id: &str) -> Result<bool> {
        (**self).delete(id)
    }
}
