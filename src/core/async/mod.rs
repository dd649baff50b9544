//! Concurrent access to the registration engine
//!
//! This module provides the thread-safe wrapper used when several tokio tasks
//! drive one registry, and the batch processor built on top of it.
//!
//! # Architecture
//!
//! - **SharedRegistry**: `EventRegistry` behind a reader/writer lock, with a
//!   per-event admission lock and a deadline on every operation
//! - **BatchProcessor**: admits roster entries partitioned by event, with a
//!   bounded number of events in flight and retries for timed out entries
//!
//! # Thread Safety
//!
//! - Admissions for different events proceed in parallel
//! - Admissions for the same event are serialized in arrival order
//! - Check-ins are atomic check-and-set operations

pub mod batch_processor;
pub mod shared_registry;

pub use batch_processor::BatchProcessor;
pub use shared_registry::SharedRegistry;
