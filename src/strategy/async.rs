//! Asynchronous batch processing strategy
//!
//! This module provides an asynchronous, multi-threaded implementation of the
//! ProcessingStrategy trait. Roster entries are read in batches and admitted
//! in parallel across events.
//!
//! # Architecture
//!
//! ```text
//! AsyncProcessingStrategy
//!     ├── BatchConfig (batch_size, max_concurrent_batches)
//!     ├── AsyncReader (batch CSV reading)
//!     ├── BatchProcessor (event partitioning, bounded in-flight events)
//!     └── SharedRegistry (per-event admission locks, deadlines)
//!         └── EventRegistry<CsvStore>
//! ```
//!
//! # Ordering
//!
//! - Batches are processed one after another
//! - Within a batch, entries are partitioned by event and each event's
//!   entries are admitted in roster order, with at most
//!   `max_concurrent_batches` events in flight
//! - Entries whose admission timed out are retried in place
//! - Seats of one event are therefore handed out in roster order across the
//!   whole file, exactly as the sync strategy does

use crate::config::RegistryConfig;
use crate::core::r#async::{BatchProcessor, SharedRegistry};
use crate::core::EventRegistry;
use crate::io::async_reader::AsyncReader;
use crate::io::csv_format::write_admissions_csv;
use crate::io::CsvStore;
use crate::strategy::ProcessingStrategy;
use crate::types::{ErrorCategory, RegistryError};
use std::io::Write;
use std::path::Path;
use std::sync::Arc;
use tracing::{info, warn};

/// Configuration for batch processing
///
/// Controls how roster entries are batched and how many events are admitted
/// in parallel within each batch.
#[derive(Clone, Debug)]
pub struct BatchConfig {
    /// Number of roster entries per batch
    pub batch_size: usize,
    /// Number of runtime worker threads and of events admitted at once
    pub max_concurrent_batches: usize,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            batch_size: 1000,
            max_concurrent_batches: num_cpus::get(),
        }
    }
}

impl BatchConfig {
    /// Create a new BatchConfig, replacing zero values with the defaults
    pub fn new(batch_size: usize, max_concurrent_batches: usize) -> Self {
        let default = Self::default();

        let batch_size = if batch_size == 0 {
            warn!(
                batch_size,
                default = default.batch_size,
                "invalid batch_size, using default"
            );
            default.batch_size
        } else {
            batch_size
        };

        let max_concurrent_batches = if max_concurrent_batches == 0 {
            warn!(
                max_concurrent_batches,
                default = default.max_concurrent_batches,
                "invalid max_concurrent_batches, using default"
            );
            default.max_concurrent_batches
        } else {
            max_concurrent_batches
        };

        Self {
            batch_size,
            max_concurrent_batches,
        }
    }
}

/// Asynchronous batch processing strategy
#[derive(Debug, Clone)]
pub struct AsyncProcessingStrategy {
    /// Batch processing configuration
    config: BatchConfig,
}

impl AsyncProcessingStrategy {
    /// Create a new AsyncProcessingStrategy with the specified configuration
    pub fn new(config: BatchConfig) -> Self {
        Self { config }
    }
}

impl ProcessingStrategy for AsyncProcessingStrategy {
    /// Admit roster entries in batches
    ///
    /// 1. Creates a tokio multi-threaded runtime
    /// 2. Opens the roster and the registry
    /// 3. Reads entries in batches with AsyncReader
    /// 4. Admits each batch through the BatchProcessor and waits for it
    ///    before reading the next
    /// 5. Writes the outcomes ordered by roster line
    ///
    /// # Error Handling
    ///
    /// Runtime creation failures, a missing roster and failed saves stop
    /// processing and are returned. Refused admissions are recorded as
    /// outcomes, as are deadlines still expiring after every retry.
    fn process(
        &self,
        config: &RegistryConfig,
        roster_path: &Path,
        output: &mut dyn Write,
    ) -> Result<(), RegistryError> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(self.config.max_concurrent_batches)
            .enable_all()
            .build()?;

        runtime.block_on(async {
            let file = tokio::fs::File::open(roster_path).await.map_err(|e| {
                match e.kind() {
                    std::io::ErrorKind::NotFound => RegistryError::FileNotFound {
                        path: roster_path.display().to_string(),
                    },
                    _ => RegistryError::from(e),
                }
            })?;

            let registry = EventRegistry::open(CsvStore::new(&config.data_dir));
            let shared = Arc::new(SharedRegistry::new(registry, config.operation_timeout));
            let processor =
                BatchProcessor::new(Arc::clone(&shared), self.config.max_concurrent_batches);

            // Wrap tokio file in a compatibility layer for csv-async
            let compat_file = tokio_util::compat::TokioAsyncReadCompatExt::compat(file);
            let mut reader = AsyncReader::new(compat_file);

            let mut outcomes = Vec::new();
            loop {
                let batch = reader.read_batch(self.config.batch_size).await;
                if batch.is_empty() {
                    break;
                }

                let results = processor.process_batch(batch).await;
                if let Some(fatal) = results.iter().find_map(|outcome| match &outcome.result {
                    Err(e) if e.category() == ErrorCategory::Io => Some(e.clone()),
                    _ => None,
                }) {
                    return Err(fatal);
                }
                outcomes.extend(results);
            }

            let admitted = outcomes.iter().filter(|o| o.result.is_ok()).count();
            info!(
                entries = outcomes.len(),
                admitted,
                refused = outcomes.len() - admitted,
                "roster processed"
            );

            write_admissions_csv(&outcomes, output)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::strategy::sync::SyncProcessingStrategy;
    use crate::types::{NewAttendee, NewEvent};
    use std::fmt::Write as _;
    use chrono::NaiveDate;
    use rust_decimal::Decimal;
    use std::io::Write;
    use tempfile::{NamedTempFile, TempDir};

    /// Helper function to create a temporary CSV file for testing
    fn create_temp_csv(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().expect("Failed to create temp file");
        file.write_all(content.as_bytes())
            .expect("Failed to write to temp file");
        file.flush().expect("Failed to flush temp file");
        file
    }

    /// Data directory with events "Small" (capacity 1) and "Large" (capacity 5)
    /// and attendees ada, bob and cy
    fn seeded_data_dir() -> TempDir {
        let dir = TempDir::new().unwrap();
        let mut registry = EventRegistry::open(CsvStore::new(dir.path()));
        let day = NaiveDate::from_ymd_opt(2026, 4, 1).unwrap();
        for (name, capacity) in [("Small", 1), ("Large", 5)] {
            registry
                .create_event(NewEvent {
                    name: name.to_string(),
                    location: String::new(),
                    start_date: day,
                    end_date: day,
                    capacity,
                    price: Decimal::ZERO,
                    description: String::new(),
                    sessions: Vec::new(),
                })
                .unwrap();
        }
        for who in ["ada", "bob", "cy"] {
            registry
                .create_attendee(NewAttendee {
                    name: who.to_string(),
                    email: format!("{}@example.com", who),
                    organization: String::new(),
                    dietary_notes: String::new(),
                })
                .unwrap();
        }
        dir
    }

    const TRACKS: u32 = 64;
    const GUESTS: u32 = 6;

    /// Data directory with `TRACKS` events of capacity 4 and `GUESTS`
    /// attendees, plus a roster registering every guest for every event
    fn crowded_data_dir() -> TempDir {
        let dir = TempDir::new().unwrap();
        let mut registry = EventRegistry::open(CsvStore::new(dir.path()));
        let day = NaiveDate::from_ymd_opt(2026, 9, 14).unwrap();
        for i in 1..=TRACKS {
            registry
                .create_event(NewEvent {
                    name: format!("Track {}", i),
                    location: String::new(),
                    start_date: day,
                    end_date: day,
                    capacity: 4,
                    price: Decimal::ZERO,
                    description: String::new(),
                    sessions: Vec::new(),
                })
                .unwrap();
        }
        for i in 1..=GUESTS {
            registry
                .create_attendee(NewAttendee {
                    name: format!("Guest {}", i),
                    email: format!("guest{}@example.com", i),
                    organization: String::new(),
                    dietary_notes: String::new(),
                })
                .unwrap();
        }

        let mut roster = String::from("event,email\n");
        for guest in 1..=GUESTS {
            for event in 1..=TRACKS {
                let _ = writeln!(roster, "{},guest{}@example.com", event, guest);
            }
        }
        std::fs::write(dir.path().join("roster.csv"), roster).unwrap();
        dir
    }

    /// Outcome rows without the random confirmation code column
    fn without_codes(output: Vec<u8>) -> Vec<String> {
        String::from_utf8(output)
            .unwrap()
            .lines()
            .skip(1)
            .map(|line| {
                let fields: Vec<&str> = line.splitn(6, ',').collect();
                format!("{},{},{},{}", fields[0], fields[1], fields[2], fields[3])
            })
            .collect()
    }

    #[test]
    fn test_async_strategy_matches_sync_across_many_events() {
        let sync_dir = crowded_data_dir();
        let async_dir = crowded_data_dir();

        let mut sync_output = Vec::new();
        SyncProcessingStrategy
            .process(
                &RegistryConfig::new(sync_dir.path(), 5000),
                &sync_dir.path().join("roster.csv"),
                &mut sync_output,
            )
            .unwrap();

        let mut async_output = Vec::new();
        AsyncProcessingStrategy::new(BatchConfig::new(1000, 4))
            .process(
                &RegistryConfig::new(async_dir.path(), 5000),
                &async_dir.path().join("roster.csv"),
                &mut async_output,
            )
            .unwrap();

        let sync_rows = without_codes(sync_output);
        let async_rows = without_codes(async_output);
        assert_eq!(async_rows.len(), (TRACKS * GUESTS) as usize);
        assert!(async_rows.iter().all(|row| !row.ends_with("REJECTED")));
        assert_eq!(async_rows, sync_rows);

        let stored = |dir: &TempDir| {
            EventRegistry::open(CsvStore::new(dir.path()))
                .repository()
                .registrations()
                .len()
        };
        assert_eq!(stored(&async_dir), (TRACKS * GUESTS) as usize);
        assert_eq!(stored(&async_dir), stored(&sync_dir));
    }

    #[test]
    fn test_batch_config_zero_values_fall_back() {
        let config = BatchConfig::new(0, 0);
        assert_eq!(config.batch_size, 1000);
        assert_eq!(config.max_concurrent_batches, num_cpus::get());
    }

    #[test]
    fn test_async_strategy_maintains_ordering_across_batches() {
        let dir = seeded_data_dir();
        let roster = create_temp_csv(
            "event,email\n\
             1,cy@example.com\n\
             2,ada@example.com\n\
             1,ada@example.com\n\
             2,bob@example.com\n\
             1,bob@example.com\n",
        );
        let config = RegistryConfig::new(dir.path(), 1000);

        // small batches force the roster across several batches
        let strategy = AsyncProcessingStrategy::new(BatchConfig::new(2, 4));
        let mut output = Vec::new();
        strategy.process(&config, roster.path(), &mut output).unwrap();

        let output_str = String::from_utf8(output).unwrap();
        let statuses: Vec<&str> = output_str
            .lines()
            .skip(1)
            .map(|line| line.split(',').nth(3).unwrap())
            .collect();
        assert_eq!(
            statuses,
            vec!["CONFIRMED", "CONFIRMED", "WAITLIST", "CONFIRMED", "WAITLIST"]
        );
    }

    #[test]
    fn test_async_strategy_persists_admissions() {
        let dir = seeded_data_dir();
        let roster = create_temp_csv("event,email\n2,ada@example.com\n2,ADA@example.com\n");
        let config = RegistryConfig::new(dir.path(), 1000);
        let mut output = Vec::new();

        AsyncProcessingStrategy::new(BatchConfig::default())
            .process(&config, roster.path(), &mut output)
            .unwrap();

        let output_str = String::from_utf8(output).unwrap();
        assert!(output_str.contains("3,2,ADA@example.com,REJECTED,,Attendee 1 is already registered for event 2"));

        let reopened = EventRegistry::open(CsvStore::new(dir.path()));
        assert_eq!(reopened.repository().registrations().len(), 1);
    }

    #[test]
    fn test_async_strategy_handles_missing_file() {
        let dir = TempDir::new().unwrap();
        let config = RegistryConfig::new(dir.path(), 1000);
        let strategy = AsyncProcessingStrategy::new(BatchConfig::default());
        let mut output = Vec::new();

        let result = strategy.process(&config, Path::new("nonexistent.csv"), &mut output);
        assert!(matches!(result, Err(RegistryError::FileNotFound { .. })));
    }
}
