//! Runtime configuration
//!
//! Values come from the command line, which also reads them from the
//! environment (and from a `.env` file loaded at startup).

use std::path::PathBuf;
use std::time::Duration;
use tracing::warn;

/// Default data directory, relative to the working directory
pub const DEFAULT_DATA_DIR: &str = "data";

/// Default deadline for a single operation
pub const DEFAULT_TIMEOUT_MS: u64 = 5000;

/// Settings shared by every command
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistryConfig {
    /// Directory holding `events.csv`, `attendees.csv` and `registrations.csv`
    pub data_dir: PathBuf,

    /// Deadline applied to each operation of the concurrent registry
    pub operation_timeout: Duration,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            operation_timeout: Duration::from_millis(DEFAULT_TIMEOUT_MS),
        }
    }
}

impl RegistryConfig {
    /// Create a config, falling back to the default for a zero timeout
    pub fn new(data_dir: impl Into<PathBuf>, timeout_ms: u64) -> Self {
        let timeout_ms = if timeout_ms == 0 {
            warn!(
                timeout_ms,
                default = DEFAULT_TIMEOUT_MS,
                "invalid operation timeout, using default"
            );
            DEFAULT_TIMEOUT_MS
        } else {
            timeout_ms
        };

        Self {
            data_dir: data_dir.into(),
            operation_timeout: Duration::from_millis(timeout_ms),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::custom(250, 250)]
    #[case::zero_falls_back(0, DEFAULT_TIMEOUT_MS)]
    fn test_timeout(#[case] timeout_ms: u64, #[case] expected_ms: u64) {
        let config = RegistryConfig::new("somewhere", timeout_ms);
        assert_eq!(config.operation_timeout, Duration::from_millis(expected_ms));
        assert_eq!(config.data_dir, PathBuf::from("somewhere"));
    }

    #[test]
    fn test_default() {
        let config = RegistryConfig::default();
        assert_eq!(config.data_dir, PathBuf::from("data"));
        assert_eq!(config.operation_timeout, Duration::from_secs(5));
    }
}
