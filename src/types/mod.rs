//! Types module
//!
//! Contains core data structures used throughout the application.
//! This module organizes types into logical submodules:
//! - `event`: Events and the input used to create them
//! - `attendee`: Attendees and the input used to create them
//! - `registration`: Registrations, admission status and check-in state
//! - `report`: Attendance summaries
//! - `roster`: Batch admission input and outcomes
//! - `error`: Error types for the registration engine

pub mod attendee;
pub mod error;
pub mod event;
pub mod registration;
pub mod report;
pub mod roster;

pub use attendee::{normalize_email, Attendee, AttendeeId, NewAttendee};
pub use error::{ErrorCategory, RegistryError};
pub use event::{Event, EventId, NewEvent};
pub use registration::{
    normalize_code, CheckInResult, CheckInState, Registration, RegistrationId,
    RegistrationStatus,
};
pub use report::AttendanceSummary;
pub use roster::{AdmissionOutcome, RosterEntry};

/// The three persisted collections
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Event,
    Attendee,
    Registration,
}

impl EntityKind {
    /// File name of the collection inside the data directory
    pub fn file_name(&self) -> &'static str {
        match self {
            EntityKind::Event => "events.csv",
            EntityKind::Attendee => "attendees.csv",
            EntityKind::Registration => "registrations.csv",
        }
    }
}
