//! Processing strategy module for batch admission
//!
//! This module defines the Strategy pattern for admitting a roster of
//! attendees, from CSV parsing through the registration engine to the
//! outcome report. The synchronous or asynchronous implementation is
//! selected at runtime.

use crate::cli::StrategyType;
use crate::config::RegistryConfig;
use crate::types::RegistryError;
use std::io::Write;
use std::path::Path;

pub mod r#async;
pub mod sync;

pub use self::r#async::{AsyncProcessingStrategy, BatchConfig};
pub use sync::SyncProcessingStrategy;

/// Processing strategy trait for batch admission pipelines
///
/// Each strategy reads roster entries from a CSV file, admits them into the
/// registry stored under `config.data_dir`, and writes one outcome row per
/// roster entry to `output`.
pub trait ProcessingStrategy: Send + Sync {
    /// Admit every roster entry and write the outcomes
    ///
    /// # Arguments
    ///
    /// * `config` - Data directory and operation deadline
    /// * `roster_path` - Path to the roster CSV (`event,email`)
    /// * `output` - Writer for the outcome CSV
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The roster cannot be opened
    /// - A registration could not be persisted
    /// - Output cannot be written
    ///
    /// Refused admissions (unknown event, duplicate registration, ...) are
    /// reported in the output and do not stop processing. Malformed roster
    /// rows are logged and skipped.
    fn process(
        &self,
        config: &RegistryConfig,
        roster_path: &Path,
        output: &mut dyn Write,
    ) -> Result<(), RegistryError>;
}

/// Create a processing strategy based on the specified strategy type
///
/// # Arguments
///
/// * `strategy_type` - The type of processing strategy to create (Sync or Async)
/// * `config` - Optional configuration for async batch processing (ignored for sync)
pub fn create_strategy(
    strategy_type: StrategyType,
    config: Option<BatchConfig>,
) -> Box<dyn ProcessingStrategy> {
    match strategy_type {
        StrategyType::Sync => Box::new(SyncProcessingStrategy),
        StrategyType::Async => {
            let config = config.unwrap_or_default();
            Box::new(AsyncProcessingStrategy::new(config))
        }
    }
}
