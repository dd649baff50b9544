//! CSV file store for the persisted collections
//!
//! Each collection lives in its own file inside a data directory
//! (`events.csv`, `attendees.csv`, `registrations.csv`).
//!
//! # Atomicity
//!
//! Saves write the full collection to a temporary file in the same directory,
//! sync it, then rename it over the target. A crash mid-write leaves the old
//! file in place; readers see either the old or the new collection.
//!
//! # Error Handling
//!
//! - Missing files load as empty collections
//! - Unreadable files load as empty collections and are logged
//! - Malformed rows are logged and skipped
//! - Write failures are returned to the caller

use crate::core::traits::RecordStore;
use crate::io::csv_format::{read_records, write_records, FlatRecord};
use crate::types::RegistryError;
use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::{debug, warn};

/// Store backed by CSV files in a data directory
#[derive(Debug, Clone)]
pub struct CsvStore {
    data_dir: PathBuf,
}

impl CsvStore {
    /// Create a store rooted at `data_dir`
    ///
    /// The directory is created lazily on the first save.
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    fn path_for<R: FlatRecord>(&self) -> PathBuf {
        self.data_dir.join(R::KIND.file_name())
    }
}

impl RecordStore for CsvStore {
    fn load<R: FlatRecord>(&self) -> Vec<R> {
        let path = self.path_for::<R>();

        let loaded = match File::open(&path) {
            Ok(file) => read_records(file),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "collection file absent, starting empty");
                return Vec::new();
            }
            Err(e) => Err(e.into()),
        };

        loaded.unwrap_or_else(|e| {
            warn!(path = %path.display(), error = %e, "collection unreadable, starting empty");
            Vec::new()
        })
    }

    fn save<R: FlatRecord>(&self, records: &[R]) -> Result<(), RegistryError> {
        std::fs::create_dir_all(&self.data_dir)?;

        let path = self.path_for::<R>();
        let temp = NamedTempFile::new_in(&self.data_dir)?;

        {
            let writer = BufWriter::new(temp.as_file());
            write_records(records, writer)?;
        }
        temp.as_file().sync_all()?;
        temp.persist(&path)?;

        debug!(path = %path.display(), records = records.len(), "collection saved");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Attendee, Event};
    use chrono::NaiveDate;
    use rust_decimal::Decimal;
    use tempfile::TempDir;

    fn sample_events() -> Vec<Event> {
        let day = NaiveDate::from_ymd_opt(2026, 9, 1).unwrap();
        vec![
            Event {
                id: 1,
                name: "RustConf".to_string(),
                location: "Portland, OR".to_string(),
                start_date: day,
                end_date: day,
                capacity: 2,
                price: Decimal::new(19900, 2),
                description: "Three days of \"Rust\"".to_string(),
                sessions: vec!["Keynote".to_string(), "Q&A | Panel".to_string()],
            },
            Event {
                id: 2,
                name: "Meetup".to_string(),
                location: String::new(),
                start_date: day,
                end_date: day,
                capacity: 40,
                price: Decimal::ZERO,
                description: String::new(),
                sessions: Vec::new(),
            },
        ]
    }

    #[test]
    fn test_missing_files_load_as_empty() {
        let dir = TempDir::new().unwrap();
        let store = CsvStore::new(dir.path().join("not-created-yet"));

        let events: Vec<Event> = store.load();
        let attendees: Vec<Attendee> = store.load();
        assert!(events.is_empty());
        assert!(attendees.is_empty());
    }

    #[test]
    fn test_saved_collection_reloads_equal() {
        let dir = TempDir::new().unwrap();
        let store = CsvStore::new(dir.path());
        let events = sample_events();

        store.save(&events).unwrap();
        let reloaded: Vec<Event> = store.load();

        assert_eq!(reloaded, events);
    }

    #[test]
    fn test_save_replaces_previous_collection() {
        let dir = TempDir::new().unwrap();
        let store = CsvStore::new(dir.path());
        let events = sample_events();

        store.save(&events).unwrap();
        store.save(&events[..1]).unwrap();
        let reloaded: Vec<Event> = store.load();

        assert_eq!(reloaded.len(), 1);
        assert_eq!(reloaded[0].name, "RustConf");
    }

    #[test]
    fn test_save_leaves_no_temp_files_behind() {
        let dir = TempDir::new().unwrap();
        let store = CsvStore::new(dir.path());

        store.save(&sample_events()).unwrap();

        let names: Vec<String> = std::fs::read_dir(dir.path())
            .unwrap()
            .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["events.csv".to_string()]);
    }

    #[test]
    fn test_save_into_unwritable_location_fails() {
        let dir = TempDir::new().unwrap();
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, "a file, not a directory").unwrap();
        let store = CsvStore::new(&blocker);

        let result = store.save(&sample_events());
        assert!(matches!(result, Err(RegistryError::IoError { .. })));
    }

    #[test]
    fn test_unreadable_collection_loads_as_empty() {
        let dir = TempDir::new().unwrap();
        // a directory where the file should be
        std::fs::create_dir(dir.path().join("events.csv")).unwrap();
        let store = CsvStore::new(dir.path());

        let events: Vec<Event> = store.load();
        assert!(events.is_empty());
    }
}
