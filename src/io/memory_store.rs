//! In-memory store for tests and benchmarks
//!
//! Keeps each collection as the exact CSV bytes the file store would write,
//! so records go through the same row conversion. Writes can be made to fail
//! on demand to exercise the registry's no-partial-update guarantee.

use crate::core::traits::RecordStore;
use crate::io::csv_format::{read_records, write_records, FlatRecord};
use crate::types::{EntityKind, RegistryError};
use dashmap::DashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use tracing::warn;

/// Thread-safe in-memory record store
#[derive(Debug, Default)]
pub struct MemoryStore {
    collections: DashMap<EntityKind, Vec<u8>>,
    fail_writes: AtomicBool,
    saves: AtomicUsize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every following save fail (or succeed again)
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Number of successful saves so far
    pub fn save_count(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }
}

impl RecordStore for MemoryStore {
    fn load<R: FlatRecord>(&self) -> Vec<R> {
        let Some(bytes) = self.collections.get(&R::KIND) else {
            return Vec::new();
        };

        read_records(bytes.as_slice()).unwrap_or_else(|e| {
            warn!(collection = R::KIND.file_name(), error = %e, "collection unreadable");
            Vec::new()
        })
    }

    fn save<R: FlatRecord>(&self, records: &[R]) -> Result<(), RegistryError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(RegistryError::IoError {
                message: format!("simulated write failure for {}", R::KIND.file_name()),
            });
        }

        let mut buffer = Vec::new();
        write_records(records, &mut buffer)?;
        self.collections.insert(R::KIND, buffer);
        self.saves.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
