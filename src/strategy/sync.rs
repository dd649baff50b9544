//! Synchronous processing strategy
//!
//! This module provides a synchronous, single-threaded implementation of the
//! ProcessingStrategy trait. It orchestrates batch admission by coordinating
//! between the SyncReader (for roster input) and EventRegistry (for business
//! logic).
//!
//! # Design
//!
//! The SyncProcessingStrategy focuses on orchestration, delegating:
//! - Roster parsing to `SyncReader` (iterator interface)
//! - Admission to `EventRegistry` (business logic and persistence)
//! - CSV output to `csv_format::write_admissions_csv` (format handling)
//!
//! Entries are admitted strictly in roster order.

use crate::config::RegistryConfig;
use crate::core::EventRegistry;
use crate::io::csv_format::write_admissions_csv;
use crate::io::sync_reader::SyncReader;
use crate::io::CsvStore;
use crate::strategy::ProcessingStrategy;
use crate::types::{AdmissionOutcome, ErrorCategory, RegistryError};
use std::io::Write;
use std::path::Path;
use tracing::{info, warn};

/// Synchronous processing strategy
///
/// # Examples
///
/// ```no_run
/// use event_registration::config::RegistryConfig;
/// use event_registration::strategy::{ProcessingStrategy, SyncProcessingStrategy};
/// use std::path::Path;
/// use std::io;
///
/// let strategy = SyncProcessingStrategy;
/// let mut output = io::stdout();
///
/// strategy
///     .process(&RegistryConfig::default(), Path::new("roster.csv"), &mut output)
///     .expect("Admission failed");
/// ```
#[derive(Debug, Clone, Copy)]
pub struct SyncProcessingStrategy;

impl ProcessingStrategy for SyncProcessingStrategy {
    /// Admit roster entries one at a time
    ///
    /// 1. Opens the roster with a SyncReader
    /// 2. Opens the registry on the data directory
    /// 3. Admits each entry by email, recording the outcome
    /// 4. Writes the outcomes ordered by roster line
    ///
    /// # Error Handling
    ///
    /// A missing roster or a failed save stops processing and is returned.
    /// Refused admissions are recorded as outcomes. Malformed rows are logged
    /// and skipped.
    fn process(
        &self,
        config: &RegistryConfig,
        roster_path: &Path,
        output: &mut dyn Write,
    ) -> Result<(), RegistryError> {
        let reader = SyncReader::new(roster_path)?;
        let mut registry = EventRegistry::open(CsvStore::new(&config.data_dir));
        let mut outcomes = Vec::new();

        for result in reader {
            match result {
                Ok(entry) => {
                    let result = registry.register_by_email(entry.event_id, &entry.email);
                    if let Err(e) = &result {
                        if e.category() == ErrorCategory::Io {
                            return Err(e.clone());
                        }
                    }
                    outcomes.push(AdmissionOutcome { entry, result });
                }
                Err(e) => warn!(error = %e, "skipping roster row"),
            }
        }

        let admitted = outcomes.iter().filter(|o| o.result.is_ok()).count();
        info!(
            entries = outcomes.len(),
            admitted,
            refused = outcomes.len() - admitted,
            "roster processed"
        );

        write_admissions_csv(&outcomes, output)
    }
}
