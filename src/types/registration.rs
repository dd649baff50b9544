//! Registration-related types for the event registration engine
//!
//! A registration links one attendee to one event. Its admission status is
//! decided once, at creation, and never changes. The only mutable part is the
//! check-in flag, which moves one way from not checked in to checked in.

use super::attendee::AttendeeId;
use super::event::EventId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Registration identifier
pub type RegistrationId = u32;

/// Admission outcome of a registration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RegistrationStatus {
    /// Holds one of the event's seats
    Confirmed,

    /// Registered after the event filled up; never admitted to check-in
    Waitlist,
}

impl RegistrationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RegistrationStatus::Confirmed => "CONFIRMED",
            RegistrationStatus::Waitlist => "WAITLIST",
        }
    }
}

/// Check-in state of a registration
///
/// `NotCheckedIn` is initial and `CheckedIn` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckInState {
    NotCheckedIn,
    CheckedIn,
}

/// A registration of one attendee for one event
#[derive(Debug, Clone, PartialEq)]
pub struct Registration {
    /// Unique registration identifier
    pub id: RegistrationId,

    /// The event registered for
    pub event_id: EventId,

    /// The registered attendee
    pub attendee_id: AttendeeId,

    /// Admission status, fixed at creation
    pub status: RegistrationStatus,

    /// Short unique code presented at check-in
    pub confirmation_code: String,

    /// Whether the attendee has checked in
    pub checked_in: bool,

    /// When the attendee checked in. Set together with `checked_in`.
    pub checked_in_at: Option<DateTime<Utc>>,

    /// When the registration was admitted
    pub created_at: DateTime<Utc>,
}

impl Registration {
    /// Current check-in state
    pub fn check_in_state(&self) -> CheckInState {
        if self.checked_in {
            CheckInState::CheckedIn
        } else {
            CheckInState::NotCheckedIn
        }
    }

    pub fn is_confirmed(&self) -> bool {
        self.status == RegistrationStatus::Confirmed
    }
}

/// Normalize a confirmation code for comparison and indexing
pub fn normalize_code(code: &str) -> String {
    code.trim().to_uppercase()
}

/// Successful check-in, returned to the caller
#[derive(Debug, Clone, PartialEq)]
pub struct CheckInResult {
    pub registration_id: RegistrationId,
    pub event_id: EventId,
    pub attendee_id: AttendeeId,
    pub confirmation_code: String,
    pub checked_in_at: DateTime<Utc>,
}
