//! Error types for the event registration engine
//!
//! This module defines all error types that can occur while creating events
//! and attendees, admitting registrations and checking attendees in.
//! Errors are designed to be descriptive and user-friendly for CLI output.
//!
//! # Error Categories
//!
//! - **Validation**: empty fields, bad date ranges, duplicate names or emails
//! - **Lookup**: unknown event, attendee, email or confirmation code
//! - **Conflict**: duplicate registration, repeated check-in, waitlisted check-in
//! - **I/O**: the store could not persist a collection (fatal to the operation)
//! - **Transient**: a shared-registry operation missed its deadline (retryable)
//!
//! No error leaves the collections partially updated.

use super::attendee::AttendeeId;
use super::event::EventId;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use thiserror::Error;

/// Broad classification of a [`RegistryError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    Lookup,
    Conflict,
    Io,
    Transient,
}

/// Main error type for the registration engine
///
/// Each variant includes the context needed to explain the refusal.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RegistryError {
    /// A required text field was blank
    #[error("{field} must not be empty")]
    EmptyField {
        /// Human readable field name
        field: String,
    },

    /// Event ends before it starts
    #[error("End date {end} is before start date {start}")]
    InvalidDateRange {
        /// Requested start date
        start: NaiveDate,
        /// Requested end date
        end: NaiveDate,
    },

    /// Event capacity below one seat
    #[error("Capacity must be at least 1, got {capacity}")]
    InvalidCapacity {
        /// Requested capacity
        capacity: u32,
    },

    /// Event price below zero
    #[error("Price must not be negative, got {price}")]
    NegativePrice {
        /// Requested price
        price: Decimal,
    },

    /// Another event already uses this name (case-insensitive)
    #[error("An event named '{name}' already exists")]
    DuplicateEventName {
        /// The conflicting name
        name: String,
    },

    /// Another attendee already uses this email (case-insensitive)
    #[error("An attendee with email '{email}' already exists")]
    DuplicateEmail {
        /// The conflicting email
        email: String,
    },

    /// No event with this id
    #[error("Event {event_id} not found")]
    EventNotFound {
        /// The unknown event id
        event_id: EventId,
    },

    /// No attendee with this id
    #[error("Attendee {attendee_id} not found")]
    AttendeeNotFound {
        /// The unknown attendee id
        attendee_id: AttendeeId,
    },

    /// No attendee with this email
    #[error("No attendee registered with email '{email}'")]
    AttendeeEmailNotFound {
        /// The unknown email
        email: String,
    },

    /// No registration carries this confirmation code
    #[error("Confirmation code '{code}' not found")]
    CodeNotFound {
        /// The unknown code
        code: String,
    },

    /// The attendee already holds a registration for the event
    #[error("Attendee {attendee_id} is already registered for event {event_id}")]
    DuplicateRegistration {
        /// Event id
        event_id: EventId,
        /// Attendee id
        attendee_id: AttendeeId,
    },

    /// The registration was already checked in
    #[error("Registration '{code}' is already checked in")]
    AlreadyCheckedIn {
        /// Confirmation code
        code: String,
    },

    /// Waitlisted registrations cannot be checked in
    #[error("Registration '{code}' is on the waitlist and cannot check in")]
    NotConfirmed {
        /// Confirmation code
        code: String,
    },

    /// Every identifier of a collection is already taken
    #[error("No identifiers left for {collection}")]
    IdsExhausted {
        /// Collection name
        collection: String,
    },

    /// File not found at the specified path
    #[error("File not found: {path}")]
    FileNotFound {
        /// The path that was not found
        path: String,
    },

    /// I/O error while reading or writing a collection or report
    #[error("I/O error: {message}")]
    IoError {
        /// Description of the I/O error
        message: String,
    },

    /// A blocking commit panicked or was cancelled before reporting back
    #[error("{operation} failed: {message}")]
    TaskFailed {
        /// Operation name
        operation: String,
        /// Join error reported by the runtime
        message: String,
    },

    /// The operation did not finish before its deadline
    #[error("{operation} timed out after {timeout_ms}ms")]
    Timeout {
        /// Operation name
        operation: String,
        /// Deadline that was exceeded
        timeout_ms: u64,
    },
}

// Conversion from io::Error to RegistryError
impl From<std::io::Error> for RegistryError {
    fn from(error: std::io::Error) -> Self {
        RegistryError::IoError {
            message: error.to_string(),
        }
    }
}

// Conversion from csv::Error to RegistryError
impl From<csv::Error> for RegistryError {
    fn from(error: csv::Error) -> Self {
        let message = match error.position() {
            Some(pos) => format!("CSV error at line {}: {}", pos.line(), error),
            None => format!("CSV error: {}", error),
        };
        RegistryError::IoError { message }
    }
}

// Conversion from a failed temp-file rename to RegistryError
impl From<tempfile::PersistError> for RegistryError {
    fn from(error: tempfile::PersistError) -> Self {
        RegistryError::IoError {
            message: error.error.to_string(),
        }
    }
}

impl RegistryError {
    /// Classify the error
    pub fn category(&self) -> ErrorCategory {
        match self {
            RegistryError::EmptyField { .. }
            | RegistryError::InvalidDateRange { .. }
            | RegistryError::InvalidCapacity { .. }
            | RegistryError::NegativePrice { .. }
            | RegistryError::DuplicateEventName { .. }
            | RegistryError::DuplicateEmail { .. }
            | RegistryError::IdsExhausted { .. } => ErrorCategory::Validation,
            RegistryError::EventNotFound { .. }
            | RegistryError::AttendeeNotFound { .. }
            | RegistryError::AttendeeEmailNotFound { .. }
            | RegistryError::CodeNotFound { .. } => ErrorCategory::Lookup,
            RegistryError::DuplicateRegistration { .. }
            | RegistryError::AlreadyCheckedIn { .. }
            | RegistryError::NotConfirmed { .. } => ErrorCategory::Conflict,
            RegistryError::FileNotFound { .. }
            | RegistryError::IoError { .. }
            | RegistryError::TaskFailed { .. } => ErrorCategory::Io,
            RegistryError::Timeout { .. } => ErrorCategory::Transient,
        }
    }

    /// Whether retrying the same request may succeed
    pub fn is_retryable(&self) -> bool {
        self.category() == ErrorCategory::Transient
    }
}

// Helper functions for creating common errors

impl RegistryError {
    /// Create an EmptyField error
    pub fn empty_field(field: &str) -> Self {
        RegistryError::EmptyField {
            field: field.to_string(),
        }
    }

    /// Create a DuplicateEventName error
    pub fn duplicate_event_name(name: &str) -> Self {
        RegistryError::DuplicateEventName {
            name: name.trim().to_string(),
        }
    }

    /// Create a DuplicateEmail error
    pub fn duplicate_email(email: &str) -> Self {
        RegistryError::DuplicateEmail {
            email: email.trim().to_string(),
        }
    }

    /// Create an EventNotFound error
    pub fn event_not_found(event_id: EventId) -> Self {
        RegistryError::EventNotFound { event_id }
    }

    /// Create an AttendeeNotFound error
    pub fn attendee_not_found(attendee_id: AttendeeId) -> Self {
        RegistryError::AttendeeNotFound { attendee_id }
    }

    /// Create an AttendeeEmailNotFound error
    pub fn attendee_email_not_found(email: &str) -> Self {
        RegistryError::AttendeeEmailNotFound {
            email: email.trim().to_string(),
        }
    }

    /// Create a CodeNotFound error
    pub fn code_not_found(code: &str) -> Self {
        RegistryError::CodeNotFound {
            code: code.trim().to_string(),
        }
    }

    /// Create a DuplicateRegistration error
    pub fn duplicate_registration(event_id: EventId, attendee_id: AttendeeId) -> Self {
        RegistryError::DuplicateRegistration {
            event_id,
            attendee_id,
        }
    }

    /// Create an AlreadyCheckedIn error
    pub fn already_checked_in(code: &str) -> Self {
        RegistryError::AlreadyCheckedIn {
            code: code.to_string(),
        }
    }

    /// Create a NotConfirmed error
    pub fn not_confirmed(code: &str) -> Self {
        RegistryError::NotConfirmed {
            code: code.to_string(),
        }
    }

    /// Create an IdsExhausted error
    pub fn ids_exhausted(collection: &str) -> Self {
        RegistryError::IdsExhausted {
            collection: collection.to_string(),
        }
    }

    /// Create a TaskFailed error
    pub fn task_failed(operation: &str, message: &str) -> Self {
        RegistryError::TaskFailed {
            operation: operation.to_string(),
            message: message.to_string(),
        }
    }

    /// Create a Timeout error
    pub fn timeout(operation: &str, timeout_ms: u64) -> Self {
        RegistryError::Timeout {
            operation: operation.to_string(),
            timeout_ms,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::event_not_found(RegistryError::event_not_found(9), "Event 9 not found")]
    #[case::attendee_not_found(RegistryError::attendee_not_found(3), "Attendee 3 not found")]
    #[case::code_not_found(
        RegistryError::code_not_found(" ab12cd34 "),
        "Confirmation code 'ab12cd34' not found"
    )]
    #[case::duplicate_registration(
        RegistryError::duplicate_registration(1, 2),
        "Attendee 2 is already registered for event 1"
    )]
    #[case::already_checked_in(
        RegistryError::already_checked_in("AB12CD34"),
        "Registration 'AB12CD34' is already checked in"
    )]
    #[case::not_confirmed(
        RegistryError::not_confirmed("AB12CD34"),
        "Registration 'AB12CD34' is on the waitlist and cannot check in"
    )]
    #[case::duplicate_email(
        RegistryError::duplicate_email("ada@example.com"),
        "An attendee with email 'ada@example.com' already exists"
    )]
    #[case::timeout(RegistryError::timeout("register", 250), "register timed out after 250ms")]
    #[case::ids_exhausted(RegistryError::ids_exhausted("events"), "No identifiers left for events")]
    fn test_error_display(#[case] error: RegistryError, #[case] expected: &str) {
        assert_eq!(error.to_string(), expected);
    }

    #[rstest]
    #[case::validation(RegistryError::empty_field("email"), ErrorCategory::Validation)]
    #[case::duplicate_name(RegistryError::duplicate_event_name("X"), ErrorCategory::Validation)]
    #[case::lookup(RegistryError::event_not_found(1), ErrorCategory::Lookup)]
    #[case::email_lookup(RegistryError::attendee_email_not_found("x"), ErrorCategory::Lookup)]
    #[case::conflict(RegistryError::duplicate_registration(1, 1), ErrorCategory::Conflict)]
    #[case::check_in_conflict(RegistryError::not_confirmed("C"), ErrorCategory::Conflict)]
    #[case::io(RegistryError::IoError { message: "disk full".to_string() }, ErrorCategory::Io)]
    #[case::ids_exhausted(RegistryError::ids_exhausted("events"), ErrorCategory::Validation)]
    #[case::task_failed(RegistryError::task_failed("register", "panicked"), ErrorCategory::Io)]
    #[case::transient(RegistryError::timeout("check_in", 10), ErrorCategory::Transient)]
    fn test_error_category(#[case] error: RegistryError, #[case] expected: ErrorCategory) {
        assert_eq!(error.category(), expected);
    }

    #[test]
    fn test_only_timeouts_are_retryable() {
        assert!(RegistryError::timeout("register", 1).is_retryable());
        assert!(!RegistryError::already_checked_in("C").is_retryable());
        assert!(!RegistryError::IoError {
            message: "x".to_string()
        }
        .is_retryable());
    }

    #[test]
    fn test_io_error_conversion() {
        let io_error =
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "Permission denied");
        let error: RegistryError = io_error.into();
        assert!(matches!(error, RegistryError::IoError { .. }));
        assert_eq!(error.to_string(), "I/O error: Permission denied");
    }
}
