//! I/O module
//!
//! Handles CSV persistence, roster input and listing output.
//!
//! # Components
//!
//! - `csv_format` - Row conversion and output serialization
//! - `csv_store` - Data directory store with atomic saves
//! - `memory_store` - In-memory store for tests and benchmarks
//! - `sync_reader` - Synchronous roster reader with iterator interface
//! - `async_reader` - Asynchronous roster reader with batch reading interface

pub mod async_reader;
pub mod csv_format;
pub mod csv_store;
pub mod memory_store;
pub mod sync_reader;

pub use async_reader::AsyncReader;
pub use csv_format::{convert_roster_record, FlatRecord, RegistrationLine, RosterRecord};
pub use csv_store::CsvStore;
pub use memory_store::MemoryStore;
pub use sync_reader::SyncReader;
