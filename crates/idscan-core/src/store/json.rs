//! Record store persisted to a single JSON file.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::{MemoryStore, RecordStore, Result, TimeRange};
use crate::error::StoreError;
use crate::models::record::{DocumentRecord, RecordSummary, RecordUpdate};

#[derive(Serialize, Deserialize, Default)]
struct StoreFile {
    records: Vec<DocumentRecord>,
}

/// Record store backed by a JSON file.
///
/// Records are held in memory and the whole file is rewritten after every
/// mutation. The file is replaced atomically, so a crash mid-write leaves the
/// previous contents intact.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    records: MemoryStore,
    write_lock: Mutex<()>,
}

impl JsonFileStore {
    /// Open the store at `path`. A missing file is an empty store.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();

        let records = if path.exists() {
            let content = std::fs::read_to_string(&path)?;
            if content.trim().is_empty() {
                Vec::new()
            } else {
                serde_json::from_str::<StoreFile>(&content)?.records
            }
        } else {
            Vec::new()
        };

        info!("Opened record store {} with {} records", path.display(), records.len());

        Ok(Self {
            path,
            records: MemoryStore::with_records(records),
            write_lock: Mutex::new(()),
        })
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    // Callers hold `write_lock`.
    fn persist(&self) -> Result<()> {
        let file = StoreFile {
            records: self.records.snapshot()?,
        };
        let content = serde_json::to_vec_pretty(&file)?;

        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        std::fs::create_dir_all(&dir)?;

        let mut tmp = tempfile::NamedTempFile::new_in(&dir)?;
        tmp.write_all(&content)?;
        tmp.as_file().sync_all()?;
        tmp.persist(&self.path).map_err(|e| StoreError::Io(e.error))?;

        debug!("Wrote {} records to {}", file.records.len(), self.path.display());
        Ok(())
    }
}

impl RecordStore for JsonFileStore {
    fn insert(&self, record: DocumentRecord) -> Result<()> {
        let _guard = self.write_lock.lock().map_err(|_| StoreError::Poisoned)?;
        let id = record.id.clone();
        self.records.insert(record)?;

        if let Err(e) = self.persist() {
            warn!("Rolling back insert of {}: {}", id, e);
            self.records.delete(&id)?;
            return Err(e);
        }
        Ok(())
    }

    fn get(&self, id: &str) -> Result<Option<DocumentRecord>> {
        self.records.get(id)
    }

    fn list(&self, range: Option<TimeRange>) -> Result<Vec<RecordSummary>> {
        self.records.list(range)
    }

    fn update(&self, id: &str, update: &RecordUpdate) -> Result<Option<DocumentRecord>> {
        let _guard = self.write_lock.lock().map_err(|_| StoreError::Poisoned)?;
        let Some(previous) = self.records.get(id)? else {
            return Ok(None);
        };
        let updated = self.records.update(id, update)?;

        if let Err(e) = self.persist() {
            warn!("Rolling back update of {}: {}", id, e);
            self.records.put(previous)?;
            return Err(e);
        }
        Ok(updated)
    }

    fn delete(&self, id: &str) -> Result<bool> {
        let _guard = self.write_lock.lock().map_err(|_| StoreError::Poisoned)?;
        let Some(previous) = self.records.get(id)? else {
            return Ok(false);
        };
        self.records.delete(id)?;

        if let Err(e) = self.persist() {
            warn!("Rolling back delete of {}: {}", id, e);
            self.records.put(previous)?;
            return Err(e);
        }
        Ok(true)
    }
}
