//! Attendee-related types for the event registration engine

use super::error::RegistryError;

/// Attendee identifier
pub type AttendeeId = u32;

/// A person who can register for events
///
/// Emails are unique across attendees, compared trimmed and case-insensitively.
#[derive(Debug, Clone, PartialEq)]
pub struct Attendee {
    /// Unique attendee identifier
    pub id: AttendeeId,

    /// Full name
    pub name: String,

    /// Contact email, stored as entered (trimmed)
    pub email: String,

    /// Company or institution, may be empty
    pub organization: String,

    /// Dietary requirements, may be empty
    pub dietary_notes: String,

    /// Four digit access PIN issued at creation
    pub pin: String,
}

/// Input for a new attendee
#[derive(Debug, Clone, PartialEq)]
pub struct NewAttendee {
    pub name: String,
    pub email: String,
    pub organization: String,
    pub dietary_notes: String,
}

impl NewAttendee {
    /// Check that name and email are present
    ///
    /// # Errors
    ///
    /// Returns `EmptyField` if the name or the email is blank.
    pub fn validate(&self) -> Result<(), RegistryError> {
        if self.name.trim().is_empty() {
            return Err(RegistryError::empty_field("attendee name"));
        }
        if self.email.trim().is_empty() {
            return Err(RegistryError::empty_field("email"));
        }
        Ok(())
    }

    /// Build the stored attendee with the issued PIN
    pub fn into_attendee(self, id: AttendeeId, pin: String) -> Attendee {
        Attendee {
            id,
            name: self.name.trim().to_string(),
            email: self.email.trim().to_string(),
            organization: self.organization.trim().to_string(),
            dietary_notes: self.dietary_notes.trim().to_string(),
            pin,
        }
    }
}

/// Normalize an email for comparison and indexing
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}
