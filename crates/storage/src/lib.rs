//! Storage Layer
//!
//! Keeps weather lookup records in memory, keyed by a generated identifier.

mod record;
mod repository;

pub use record::{RecordId, StoredRecord, WeatherRequest};
pub use repository::{InMemoryRecordStore, RecordStore};

use thiserror::Error;

/// Storage errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Record not found: {0}")]
    NotFound(String),
    #[error("Record already exists: {0}")]
    DuplicateId(String),
    #[error("Store lock poisoned: {0}")]
    LockPoisoned(String),
}
