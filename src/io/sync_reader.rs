//! Synchronous roster reader with iterator interface
//!
//! Provides a streaming iterator over roster entries from a CSV file.
//! Delegates CSV format concerns to the csv_format module.
//!
//! # Iterator Interface
//!
//! SyncReader implements the Iterator trait, yielding `Result<RosterEntry, String>`
//! for each CSV row:
//!
//! ```no_run
//! use event_registration::io::sync_reader::SyncReader;
//! use std::path::Path;
//!
//! let reader = SyncReader::new(Path::new("roster.csv")).unwrap();
//! for result in reader {
//!     match result {
//!         Ok(entry) => println!("Admitting {} to event {}", entry.email, entry.event_id),
//!         Err(e) => eprintln!("Skipped: {}", e),
//!     }
//! }
//! ```
//!
//! # Error Handling
//!
//! - Fatal errors (file not found, unreadable file) are returned from `new()`
//! - Row parsing errors are yielded as Err variants in the iterator
//! - An I/O error while reading is yielded once and ends the iteration
//! - Line numbers are included in error messages

use crate::io::csv_format::{convert_roster_record, RosterRecord};
use crate::types::{RegistryError, RosterEntry};
use csv::{ReaderBuilder, Trim};
use std::fs::File;
use std::path::Path;

/// Synchronous roster reader
///
/// Reads one row at a time; memory use does not grow with the file.
#[derive(Debug)]
pub struct SyncReader {
    reader: csv::Reader<File>,
    line_num: u64,
    finished: bool,
}

impl SyncReader {
    /// Open a roster file
    ///
    /// Fields are trimmed and rows may have a variable number of fields.
    ///
    /// # Errors
    ///
    /// - `FileNotFound` if the file does not exist
    /// - `IoError` if it cannot be opened
    pub fn new(path: &Path) -> Result<Self, RegistryError> {
        let file = File::open(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => RegistryError::FileNotFound {
                path: path.display().to_string(),
            },
            _ => RegistryError::from(e),
        })?;

        let reader = ReaderBuilder::new()
            .trim(Trim::All)
            .flexible(true)
            .buffer_capacity(8 * 1024)
            .from_reader(file);

        Ok(Self {
            reader,
            line_num: 1,
            finished: false,
        })
    }
}

impl Iterator for SyncReader {
    type Item = Result<RosterEntry, String>;

    /// Get the next roster entry
    ///
    /// # Returns
    ///
    /// * `Some(Ok(RosterEntry))` - Successfully parsed row
    /// * `Some(Err(String))` - Parse or conversion error with line number
    /// * `None` - End of file reached, or reading failed
    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        let next = self.reader.deserialize::<RosterRecord>().next()?;
        self.line_num += 1;
        let line = self.line_num;

        match next {
            Ok(record) => {
                Some(convert_roster_record(record, line).map_err(|e| format!("Line {}: {}", line, e)))
            }
            Err(e) => {
                if e.is_io_error() {
                    self.finished = true;
                }
                Some(Err(format!("Line {}: CSV parse error: {}", line, e)))
            }
        }
    }
}
