//! Event Registration Engine Library
//! # Overview
//!
//! This library manages event registration: events with a finite capacity,
//! attendees, admission of registrations as CONFIRMED or WAITLIST, check-in
//! at the door and attendance reporting. Collections persist as CSV files in
//! a data directory.
//!
//! # Architecture
//!
//! The system is organized into several key components:
//!
//! - [`types`] - Core data types (Event, Attendee, Registration, errors)
//! - [`config`] - Runtime configuration
//! - [`cli`] - CLI argument parsing and command dispatch
//! - [`core`] - Business logic components:
//!   - [`core::repository`] - Indexed in-memory views over the collections
//!   - [`core::admission`] - CONFIRMED / WAITLIST decisions
//!   - [`core::check_in`] - Check-in state machine
//!   - [`core::registry`] - Operation orchestration and the transaction boundary
//!   - [`core::r#async`] - Concurrent registry and batch admission
//! - [`io`] - CSV stores, roster readers and output writers
//! - [`strategy`] - Sync and async batch admission pipelines
//!
//! # Admission
//!
//! A new registration is CONFIRMED while the event's CONFIRMED count is below
//! its capacity, and WAITLIST otherwise. The status never changes afterwards.
//!
//! # Check-in
//!
//! Only CONFIRMED registrations can check in, and only once:
//!
//! - **NotCheckedIn**: initial state
//! - **CheckedIn**: terminal, with the check-in timestamp recorded

// Module declarations
pub mod cli;
pub mod config;
pub mod core;
pub mod io;
pub mod strategy;
pub mod types;

pub use config::RegistryConfig;
pub use core::{EventRegistry, RecordStore, Repository, SharedRegistry};
pub use io::{CsvStore, MemoryStore};
pub use types::{
    AttendanceSummary, Attendee, AttendeeId, CheckInResult, ErrorCategory, Event, EventId,
    NewAttendee, NewEvent, Registration, RegistrationId, RegistrationStatus, RegistryError,
};
