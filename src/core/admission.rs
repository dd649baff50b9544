//! Admission decisions for new registrations
//!
//! Admission is split in two steps so the concurrent registry can hold a
//! per-event lock across both while only taking the collection writer lock
//! for the second:
//!
//! 1. `plan_admission` checks the preconditions and decides the status from
//!    the live CONFIRMED count. It only reads the repository.
//! 2. `AdmissionTicket::into_registration` turns the decision into a record
//!    once an identifier and confirmation code have been assigned.
//!
//! The status decided here is final. Registrations are never promoted from
//! the waitlist.

use crate::core::repository::Repository;
use crate::types::{
    AttendeeId, EventId, Registration, RegistrationId, RegistrationStatus, RegistryError,
};
use chrono::{DateTime, Utc};

/// Decide the status of a new registration
///
/// # Arguments
///
/// * `confirmed` - CONFIRMED registrations already held for the event
/// * `capacity` - The event's capacity
///
/// # Returns
///
/// `Confirmed` while a seat is left, `Waitlist` otherwise
pub fn decide_status(confirmed: usize, capacity: u32) -> RegistrationStatus {
    if confirmed < capacity as usize {
        RegistrationStatus::Confirmed
    } else {
        RegistrationStatus::Waitlist
    }
}

/// An admission decision that has not been recorded yet
///
/// Only `plan_admission` can create a ticket, so holding one means the
/// preconditions held when it was issued.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdmissionTicket {
    event_id: EventId,
    attendee_id: AttendeeId,
    status: RegistrationStatus,
}

impl AdmissionTicket {
    pub fn event_id(&self) -> EventId {
        self.event_id
    }

    pub fn attendee_id(&self) -> AttendeeId {
        self.attendee_id
    }

    pub fn status(&self) -> RegistrationStatus {
        self.status
    }

    /// Build the registration record for this decision
    pub(crate) fn into_registration(
        self,
        id: RegistrationId,
        confirmation_code: String,
        created_at: DateTime<Utc>,
    ) -> Registration {
        Registration {
            id,
            event_id: self.event_id,
            attendee_id: self.attendee_id,
            status: self.status,
            confirmation_code,
            checked_in: false,
            checked_in_at: None,
            created_at,
        }
    }
}

/// Check the admission preconditions and decide the status
///
/// # Errors
///
/// The first failing check wins, in this order:
/// - `EventNotFound` if the event does not exist
/// - `AttendeeNotFound` if the attendee does not exist
/// - `DuplicateRegistration` if the pair is already registered
pub fn plan_admission(
    repository: &Repository,
    event_id: EventId,
    attendee_id: AttendeeId,
) -> Result<AdmissionTicket, RegistryError> {
    let event = repository
        .find_event_by_id(event_id)
        .ok_or_else(|| RegistryError::event_not_found(event_id))?;

    if repository.find_attendee_by_id(attendee_id).is_none() {
        return Err(RegistryError::attendee_not_found(attendee_id));
    }

    if repository.find_registration(event_id, attendee_id).is_some() {
        return Err(RegistryError::duplicate_registration(event_id, attendee_id));
    }

    let status = decide_status(repository.confirmed_count(event_id), event.capacity);

    Ok(AdmissionTicket {
        event_id,
        attendee_id,
        status,
    })
}
