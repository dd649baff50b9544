//! In-memory entity repository
//!
//! This module provides the `Repository` struct which owns the loaded event,
//! attendee and registration collections and keeps hash indices over them for
//! lookups and duplicate detection.
//!
//! # Duplicate Handling
//!
//! The collections should never contain duplicate keys, but stored data can
//! predate a fix. When two records share a key, indices point at the first
//! one in insertion order, exactly like a linear scan would.

use crate::types::{
    normalize_code, normalize_email, Attendee, AttendeeId, EntityKind, Event, EventId,
    Registration, RegistrationId, RegistrationStatus, RegistryError,
};
use std::collections::HashMap;

/// Indexed in-memory views over the three collections
#[derive(Debug, Default, Clone)]
pub struct Repository {
    events: Vec<Event>,
    attendees: Vec<Attendee>,
    registrations: Vec<Registration>,

    event_by_id: HashMap<EventId, usize>,
    event_by_name: HashMap<String, usize>,
    attendee_by_id: HashMap<AttendeeId, usize>,
    attendee_by_email: HashMap<String, usize>,
    registration_by_pair: HashMap<(EventId, AttendeeId), usize>,
    registration_by_code: HashMap<String, usize>,
}

fn normalize_name(name: &str) -> String {
    name.trim().to_lowercase()
}

fn next_id(ids: impl Iterator<Item = u32>, kind: EntityKind) -> Result<u32, RegistryError> {
    ids.max()
        .unwrap_or(0)
        .checked_add(1)
        .ok_or_else(|| RegistryError::ids_exhausted(kind.file_name()))
}

impl Repository {
    /// Create an empty repository
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a repository from loaded collections, preserving their order
    pub fn from_collections(
        events: Vec<Event>,
        attendees: Vec<Attendee>,
        registrations: Vec<Registration>,
    ) -> Self {
        let mut repository = Self::new();
        for event in events {
            repository.insert_event(event);
        }
        for attendee in attendees {
            repository.insert_attendee(attendee);
        }
        for registration in registrations {
            repository.insert_registration(registration);
        }
        repository
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn attendees(&self) -> &[Attendee] {
        &self.attendees
    }

    pub fn registrations(&self) -> &[Registration] {
        &self.registrations
    }

    pub fn find_event_by_id(&self, id: EventId) -> Option<&Event> {
        self.event_by_id.get(&id).and_then(|&i| self.events.get(i))
    }

    pub fn find_attendee_by_id(&self, id: AttendeeId) -> Option<&Attendee> {
        self.attendee_by_id
            .get(&id)
            .and_then(|&i| self.attendees.get(i))
    }

    /// Find an attendee by email, trimmed and case-insensitive
    pub fn find_attendee_by_email(&self, email: &str) -> Option<&Attendee> {
        self.attendee_by_email
            .get(&normalize_email(email))
            .and_then(|&i| self.attendees.get(i))
    }

    /// Whether an event already uses this name, trimmed and case-insensitive
    pub fn exists_event_with_name(&self, name: &str) -> bool {
        self.event_by_name.contains_key(&normalize_name(name))
    }

    pub fn exists_attendee_with_email(&self, email: &str) -> bool {
        self.attendee_by_email.contains_key(&normalize_email(email))
    }

    pub fn find_registration(
        &self,
        event_id: EventId,
        attendee_id: AttendeeId,
    ) -> Option<&Registration> {
        self.registration_by_pair
            .get(&(event_id, attendee_id))
            .and_then(|&i| self.registrations.get(i))
    }

    /// Find a registration by confirmation code, case-insensitive
    pub fn find_registration_by_code(&self, code: &str) -> Option<&Registration> {
        self.registration_position_by_code(code)
            .and_then(|i| self.registrations.get(i))
    }

    /// Position of a registration in the collection, by confirmation code
    pub fn registration_position_by_code(&self, code: &str) -> Option<usize> {
        self.registration_by_code.get(&normalize_code(code)).copied()
    }

    /// All registrations for an event, in insertion order
    pub fn registrations_for_event(
        &self,
        event_id: EventId,
    ) -> impl Iterator<Item = &Registration> + '_ {
        self.registrations
            .iter()
            .filter(move |registration| registration.event_id == event_id)
    }

    /// Number of CONFIRMED registrations currently held for an event
    pub fn confirmed_count(&self, event_id: EventId) -> usize {
        self.registrations_for_event(event_id)
            .filter(|registration| registration.status == RegistrationStatus::Confirmed)
            .count()
    }

    /// Identifier after the highest stored event id
    ///
    /// # Errors
    ///
    /// `IdsExhausted` once an event holds `EventId::MAX`.
    pub fn next_event_id(&self) -> Result<EventId, RegistryError> {
        next_id(self.events.iter().map(|e| e.id), EntityKind::Event)
    }

    pub fn next_attendee_id(&self) -> Result<AttendeeId, RegistryError> {
        next_id(self.attendees.iter().map(|a| a.id), EntityKind::Attendee)
    }

    pub fn next_registration_id(&self) -> Result<RegistrationId, RegistryError> {
        next_id(
            self.registrations.iter().map(|r| r.id),
            EntityKind::Registration,
        )
    }

    /// Append an event and index it
    pub fn insert_event(&mut self, event: Event) {
        let position = self.events.len();
        self.event_by_id.entry(event.id).or_insert(position);
        self.event_by_name
            .entry(normalize_name(&event.name))
            .or_insert(position);
        self.events.push(event);
    }

    /// Append an attendee and index it
    pub fn insert_attendee(&mut self, attendee: Attendee) {
        let position = self.attendees.len();
        self.attendee_by_id.entry(attendee.id).or_insert(position);
        self.attendee_by_email
            .entry(normalize_email(&attendee.email))
            .or_insert(position);
        self.attendees.push(attendee);
    }

    /// Append a registration and index it
    pub fn insert_registration(&mut self, registration: Registration) {
        let position = self.registrations.len();
        self.registration_by_pair
            .entry((registration.event_id, registration.attendee_id))
            .or_insert(position);
        self.registration_by_code
            .entry(normalize_code(&registration.confirmation_code))
            .or_insert(position);
        self.registrations.push(registration);
    }

    /// Replace the registration at `position` in place
    ///
    /// Only the check-in fields may differ; the indexed keys (event,
    /// attendee and code) must be unchanged.
    ///
    /// # Returns
    ///
    /// `false` if `position` is out of range
    pub fn replace_registration(&mut self, position: usize, registration: Registration) -> bool {
        match self.registrations.get_mut(position) {
            Some(slot) => {
                debug_assert_eq!(slot.confirmation_code, registration.confirmation_code);
                *slot = registration;
                true
            }
            None => false,
        }
    }
}
