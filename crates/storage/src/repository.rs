//! Repository Implementation

use crate::{RecordId, StorageError, StoredRecord};
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::sync::RwLock;
use tracing::{debug, info};

/// Key-value store for weather records
///
/// Records are inserted whole and never updated, so a reader observes either
/// no record or a complete one.
pub trait RecordStore: Send + Sync {
    /// Insert a record under its id; fails if the id is already taken
    fn insert(&self, record: StoredRecord) -> Result<(), StorageError>;

    /// Look up a record by id
    fn get(&self, id: &RecordId) -> Result<StoredRecord, StorageError>;

    /// Number of stored records
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Process-lifetime in-memory store (no eviction, no size bound)
pub struct InMemoryRecordStore {
    records: RwLock<HashMap<RecordId, StoredRecord>>,
}

impl InMemoryRecordStore {
    /// Create an empty store
    pub fn new() -> Self {
        info!("Creating in-memory record store");
        Self {
            records: RwLock::new(HashMap::new()),
        }
    }
}

impl Default for InMemoryRecordStore {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordStore for InMemoryRecordStore {
    fn insert(&self, record: StoredRecord) -> Result<(), StorageError> {
        let mut records = self.records.write().map_err(|e| {
            StorageError::LockPoisoned(format!("Lock error: {}", e))
        })?;

        match records.entry(record.id.clone()) {
            Entry::Occupied(entry) => Err(StorageError::DuplicateId(entry.key().to_string())),
            Entry::Vacant(entry) => {
                debug!("Inserted record with ID {}", record.id);
                entry.insert(record);
                Ok(())
            }
        }
    }

    fn get(&self, id: &RecordId) -> Result<StoredRecord, StorageError> {
        let records = self.records.read().map_err(|e| {
            StorageError::LockPoisoned(format!("Lock error: {}", e))
        })?;

        records
            .get(id)
            .cloned()
            .ok_or_else(|| StorageError::NotFound(id.to_string()))
    }

    fn len(&self) -> usize {
        match self.records.read() {
            Ok(records) => records.len(),
            // records are inserted whole, so the map is intact after a panic
            Err(poisoned) => poisoned.into_inner().len(),
        }
    }
}
