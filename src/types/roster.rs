//! Roster types for batch admission
//!
//! A roster is a CSV file of `event,email` rows. Each row asks for the
//! attendee with that email to be registered for that event.

use super::error::RegistryError;
use super::event::EventId;
use super::registration::Registration;

/// One parsed roster row
#[derive(Debug, Clone, PartialEq)]
pub struct RosterEntry {
    /// Line number in the roster file (header is line 1)
    pub line: u64,

    /// Event to register for
    pub event_id: EventId,

    /// Email of an existing attendee
    pub email: String,
}

/// Result of admitting a single roster entry
#[derive(Debug, Clone)]
pub struct AdmissionOutcome {
    /// The roster entry that was processed
    pub entry: RosterEntry,

    /// The admitted registration or the reason it was refused
    pub result: Result<Registration, RegistryError>,
}
