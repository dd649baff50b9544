//! Core traits for record persistence
//!
//! This module defines the store abstraction that lets the registry run on
//! the CSV data directory in production and on an in-memory buffer in tests.

use crate::io::csv_format::FlatRecord;
use crate::types::RegistryError;

/// Durable storage for the three record collections
///
/// Implementations must be shareable across threads so the registry can be
/// wrapped by the concurrent `SharedRegistry`.
pub trait RecordStore: Send + Sync {
    /// Load a whole collection in insertion order
    ///
    /// Never fails: a missing or unreadable collection loads as empty.
    fn load<R: FlatRecord>(&self) -> Vec<R>;

    /// Replace a whole collection
    ///
    /// Readers never observe a partially written collection.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the collection could not be persisted. The
    /// previously saved collection is left intact in that case.
    fn save<R: FlatRecord>(&self, records: &[R]) -> Result<(), RegistryError>;
}
