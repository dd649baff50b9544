//! Batch admission with event-based partitioning
//!
//! This module provides the `BatchProcessor` struct, which admits a batch of
//! roster entries concurrently while keeping the file order of entries that
//! target the same event.
//!
//! # Design
//!
//! The `BatchProcessor` partitions a batch by event ID. Each event's entries are
//! admitted sequentially, so seats of one event are handed out in roster
//! order. Up to `max_in_flight` events are admitted at once; the rest wait
//! for a slot instead of queueing on the registry's writer lock.
//!
//! An entry whose admission missed its deadline is submitted again before
//! the next entry of the same event, up to `MAX_ADMISSION_ATTEMPTS` times.
//!
//! # Architecture
//!
//! ```text
//! BatchProcessor
//!     ├── Arc<SharedRegistry<S>>  (shared registry with per-event locks)
//!     └── usize                   (events admitted concurrently)
//! ```

use std::collections::HashMap;
use std::sync::Arc;

use futures::stream::{self, StreamExt};
use tracing::warn;

use super::SharedRegistry;
use crate::core::traits::RecordStore;
use crate::types::{AdmissionOutcome, EventId, RosterEntry};

/// Attempts per roster entry while admissions keep timing out
pub const MAX_ADMISSION_ATTEMPTS: u32 = 5;

/// Batch processor with event-based partitioning
#[derive(Debug)]
pub struct BatchProcessor<S: RecordStore> {
    /// Registry shared by every partition
    registry: Arc<SharedRegistry<S>>,

    /// Number of events admitted concurrently
    max_in_flight: usize,
}

impl<S: RecordStore + 'static> BatchProcessor<S> {
    /// Create a new BatchProcessor
    ///
    /// # Arguments
    ///
    /// * `registry` - Arc-wrapped SharedRegistry the entries are admitted into
    /// * `max_in_flight` - Events admitted at once (at least 1)
    pub fn new(registry: Arc<SharedRegistry<S>>, max_in_flight: usize) -> Self {
        Self {
            registry,
            max_in_flight: max_in_flight.max(1),
        }
    }

    /// Partition a batch of roster entries by event ID
    ///
    /// # Guarantees
    ///
    /// - Each entry appears in exactly one partition
    /// - Entries for each event keep their original order
    pub fn partition_by_event(
        &self,
        batch: Vec<RosterEntry>,
    ) -> HashMap<EventId, Vec<RosterEntry>> {
        let mut event_batches: HashMap<EventId, Vec<RosterEntry>> = HashMap::new();

        for entry in batch {
            event_batches.entry(entry.event_id).or_default().push(entry);
        }

        event_batches
    }

    /// Admit all entries for a single event in order
    ///
    /// Refused entries are captured in their outcome and do not stop the rest.
    /// Timed out entries are retried before moving on.
    pub async fn process_event_entries(&self, entries: Vec<RosterEntry>) -> Vec<AdmissionOutcome> {
        let mut outcomes = Vec::with_capacity(entries.len());

        for entry in entries {
            let mut attempt = 1;
            let result = loop {
                match self
                    .registry
                    .register_by_email(entry.event_id, &entry.email)
                    .await
                {
                    Err(e) if e.is_retryable() && attempt < MAX_ADMISSION_ATTEMPTS => {
                        warn!(line = entry.line, attempt, error = %e, "retrying admission");
                        attempt += 1;
                    }
                    result => break result,
                }
            };
            outcomes.push(AdmissionOutcome { entry, result });
        }

        outcomes
    }

    /// Admit a batch of roster entries with event-based partitioning
    ///
    /// 1. Partition the batch by event ID
    /// 2. Admit up to `max_in_flight` events concurrently
    /// 3. Collect every entry's outcome as its event completes
    ///
    /// Every entry of the batch yields exactly one outcome. Outcomes are not
    /// in roster order; sort by `entry.line` if needed.
    pub async fn process_batch(&self, batch: Vec<RosterEntry>) -> Vec<AdmissionOutcome> {
        let event_batches = self.partition_by_event(batch);

        let mut partitions = stream::iter(event_batches.into_values())
            .map(|entries| self.process_event_entries(entries))
            .buffer_unordered(self.max_in_flight);

        let mut outcomes = Vec::new();
        while let Some(event_outcomes) = partitions.next().await {
            outcomes.extend(event_outcomes);
        }

        outcomes
    }
}
