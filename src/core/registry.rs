//! Event registration engine
//!
//! This module provides the `EventRegistry` that owns the record store and the
//! in-memory repository, and orchestrates every state-changing operation:
//! event and attendee creation, admission and check-in.
//!
//! # Transaction Boundary
//!
//! Every write follows the same shape:
//!
//! 1. Validate against the live repository
//! 2. Build a staged copy of the affected collection with the change applied
//! 3. Persist the staged copy through the store
//! 4. Apply the change to the live repository only once the save succeeded
//!
//! A failed save therefore leaves both the persisted and the in-memory
//! collections exactly as they were.

use crate::core::admission::{plan_admission, AdmissionTicket};
use crate::core::check_in::check_in_transition;
use crate::core::codes::{generate_confirmation_code, generate_pin};
use crate::core::report;
use crate::core::repository::Repository;
use crate::core::traits::RecordStore;
use crate::io::csv_format::RegistrationLine;
use crate::types::{
    normalize_email, AttendanceSummary, Attendee, AttendeeId, CheckInResult, Event, EventId,
    NewAttendee, NewEvent, Registration, RegistryError,
};
use chrono::Utc;
use tracing::{debug, info};

/// Registration engine over a record store
///
/// Owns the store and the repository; there is no other shared state.
#[derive(Debug)]
pub struct EventRegistry<S: RecordStore> {
    store: S,
    repository: Repository,
}

impl<S: RecordStore> EventRegistry<S> {
    /// Open a registry by loading all collections from `store`
    ///
    /// Missing or unreadable collections start empty.
    pub fn open(store: S) -> Self {
        let events: Vec<Event> = store.load();
        let attendees: Vec<Attendee> = store.load();
        let registrations: Vec<Registration> = store.load();

        debug!(
            events = events.len(),
            attendees = attendees.len(),
            registrations = registrations.len(),
            "registry loaded"
        );

        Self {
            store,
            repository: Repository::from_collections(events, attendees, registrations),
        }
    }

    pub fn repository(&self) -> &Repository {
        &self.repository
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Create a new event
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - A field rule fails (see `NewEvent::validate`)
    /// - An event with the same name exists, ignoring case and surrounding whitespace
    /// - The events collection could not be saved
    pub fn create_event(&mut self, new_event: NewEvent) -> Result<Event, RegistryError> {
        new_event.validate()?;

        if self.repository.exists_event_with_name(&new_event.name) {
            return Err(RegistryError::duplicate_event_name(&new_event.name));
        }

        let event = new_event.into_event(self.repository.next_event_id()?);

        let mut staged = self.repository.events().to_vec();
        staged.push(event.clone());
        self.store.save(&staged)?;

        self.repository.insert_event(event.clone());
        info!(event_id = event.id, name = %event.name, capacity = event.capacity, "event created");
        Ok(event)
    }

    /// Create a new attendee and issue their access PIN
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The name or email is blank
    /// - Another attendee already uses the email, ignoring case
    /// - The attendees collection could not be saved
    pub fn create_attendee(&mut self, new_attendee: NewAttendee) -> Result<Attendee, RegistryError> {
        new_attendee.validate()?;

        if self.repository.exists_attendee_with_email(&new_attendee.email) {
            return Err(RegistryError::duplicate_email(&new_attendee.email));
        }

        let attendee =
            new_attendee.into_attendee(self.repository.next_attendee_id()?, generate_pin());

        let mut staged = self.repository.attendees().to_vec();
        staged.push(attendee.clone());
        self.store.save(&staged)?;

        self.repository.insert_attendee(attendee.clone());
        info!(attendee_id = attendee.id, email = %attendee.email, "attendee created");
        Ok(attendee)
    }

    /// Check admission preconditions and decide the status, without writing
    ///
    /// # Errors
    ///
    /// `EventNotFound`, `AttendeeNotFound` or `DuplicateRegistration`, first
    /// failure wins.
    pub fn plan_registration(
        &self,
        event_id: EventId,
        attendee_id: AttendeeId,
    ) -> Result<AdmissionTicket, RegistryError> {
        plan_admission(&self.repository, event_id, attendee_id)
    }

    /// Record a planned admission
    ///
    /// Assigns the next identifier and a fresh confirmation code, then
    /// persists. The caller must ensure no other admission for the same
    /// event ran between planning and committing.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the registrations collection could not be
    /// saved. Nothing is recorded in that case.
    pub fn commit_registration(
        &mut self,
        ticket: AdmissionTicket,
    ) -> Result<Registration, RegistryError> {
        let repository = &self.repository;
        let code = generate_confirmation_code(|candidate| {
            repository.find_registration_by_code(candidate).is_some()
        });
        let registration =
            ticket.into_registration(repository.next_registration_id()?, code, Utc::now());

        let mut staged = self.repository.registrations().to_vec();
        staged.push(registration.clone());
        self.store.save(&staged)?;

        self.repository.insert_registration(registration.clone());
        info!(
            registration_id = registration.id,
            event_id = registration.event_id,
            attendee_id = registration.attendee_id,
            status = registration.status.as_str(),
            code = %registration.confirmation_code,
            "registration admitted"
        );
        Ok(registration)
    }

    /// Register an attendee for an event
    ///
    /// The registration is CONFIRMED while the event has seats left and
    /// WAITLIST otherwise.
    ///
    /// # Errors
    ///
    /// - `EventNotFound`, `AttendeeNotFound` or `DuplicateRegistration`
    /// - An I/O error if the registration could not be saved
    pub fn register(
        &mut self,
        event_id: EventId,
        attendee_id: AttendeeId,
    ) -> Result<Registration, RegistryError> {
        let ticket = self.plan_registration(event_id, attendee_id)?;
        self.commit_registration(ticket)
    }

    /// Register the attendee with `email` for an event
    ///
    /// The event is checked before the email is resolved.
    ///
    /// # Errors
    ///
    /// - `EventNotFound` if the event does not exist
    /// - `AttendeeEmailNotFound` if no attendee uses the email
    /// - Any error from `register`
    pub fn register_by_email(
        &mut self,
        event_id: EventId,
        email: &str,
    ) -> Result<Registration, RegistryError> {
        let attendee_id = self.resolve_email(event_id, email)?;
        self.register(event_id, attendee_id)
    }

    /// Resolve a roster email to an attendee, checking the event first
    pub(crate) fn resolve_email(
        &self,
        event_id: EventId,
        email: &str,
    ) -> Result<AttendeeId, RegistryError> {
        if self.repository.find_event_by_id(event_id).is_none() {
            return Err(RegistryError::event_not_found(event_id));
        }

        self.repository
            .find_attendee_by_email(email)
            .map(|attendee| attendee.id)
            .ok_or_else(|| RegistryError::attendee_email_not_found(&normalize_email(email)))
    }

    /// Check in the registration holding `code`
    ///
    /// The code is matched ignoring case and surrounding whitespace.
    ///
    /// # Errors
    ///
    /// - `CodeNotFound` if no registration holds the code
    /// - `AlreadyCheckedIn` if it was checked in before
    /// - `NotConfirmed` if it is on the waitlist
    /// - An I/O error if the change could not be saved
    pub fn check_in(&mut self, code: &str) -> Result<CheckInResult, RegistryError> {
        let position = self
            .repository
            .registration_position_by_code(code)
            .ok_or_else(|| RegistryError::code_not_found(code))?;

        let now = Utc::now();
        let current = &self.repository.registrations()[position];
        let updated = check_in_transition(current, now)?;

        let mut staged = self.repository.registrations().to_vec();
        staged[position] = updated.clone();
        self.store.save(&staged)?;

        let result = CheckInResult {
            registration_id: updated.id,
            event_id: updated.event_id,
            attendee_id: updated.attendee_id,
            confirmation_code: updated.confirmation_code.clone(),
            checked_in_at: now,
        };
        self.repository.replace_registration(position, updated);

        info!(
            registration_id = result.registration_id,
            code = %result.confirmation_code,
            "checked in"
        );
        Ok(result)
    }

    /// Per-event attendance summaries in event creation order
    pub fn attendance_report(&self) -> impl Iterator<Item = AttendanceSummary> + '_ {
        report::attendance_report(&self.repository)
    }

    /// Events paired with their current CONFIRMED count
    pub fn event_overview(&self) -> impl Iterator<Item = (&Event, usize)> + '_ {
        self.repository
            .events()
            .iter()
            .map(move |event| (event, self.repository.confirmed_count(event.id)))
    }

    /// Registrations joined with attendee and event names
    ///
    /// Names of records missing from the stored data are left empty.
    pub fn registration_lines(&self) -> impl Iterator<Item = RegistrationLine<'_>> + '_ {
        self.repository
            .registrations()
            .iter()
            .map(move |registration| RegistrationLine {
                registration,
                attendee_name: self
                    .repository
                    .find_attendee_by_id(registration.attendee_id)
                    .map_or("", |attendee| attendee.name.as_str()),
                event_name: self
                    .repository
                    .find_event_by_id(registration.event_id)
                    .map_or("", |event| event.name.as_str()),
            })
    }
}
