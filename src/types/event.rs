//! Event-related types for the event registration engine
//!
//! This module defines the Event structure along with the `NewEvent` input
//! used to create one. Events are immutable once created.

use super::error::RegistryError;
use chrono::NaiveDate;
use rust_decimal::Decimal;

/// Event identifier
///
/// Assigned sequentially by the repository, starting at 1.
pub type EventId = u32;

/// A scheduled event with a finite number of confirmed seats
#[derive(Debug, Clone, PartialEq)]
pub struct Event {
    /// Unique event identifier
    pub id: EventId,

    /// Display name, unique across events (case-insensitive)
    pub name: String,

    /// Venue or address
    pub location: String,

    /// First day of the event
    pub start_date: NaiveDate,

    /// Last day of the event (never before `start_date`)
    pub end_date: NaiveDate,

    /// Maximum number of CONFIRMED registrations (at least 1)
    pub capacity: u32,

    /// Ticket price (never negative)
    pub price: Decimal,

    /// Free-form description
    pub description: String,

    /// Session titles. Carried for listings only; admission ignores them.
    pub sessions: Vec<String>,
}

impl Event {
    /// Check a stored event against the same per-field rules as `NewEvent`
    ///
    /// # Errors
    ///
    /// The first rule the event breaks, as in `NewEvent::validate`.
    pub fn validate(&self) -> Result<(), RegistryError> {
        check_fields(
            &self.name,
            self.start_date,
            self.end_date,
            self.capacity,
            self.price,
        )
    }
}

fn check_fields(
    name: &str,
    start_date: NaiveDate,
    end_date: NaiveDate,
    capacity: u32,
    price: Decimal,
) -> Result<(), RegistryError> {
    if name.trim().is_empty() {
        return Err(RegistryError::empty_field("event name"));
    }

    if end_date < start_date {
        return Err(RegistryError::InvalidDateRange {
            start: start_date,
            end: end_date,
        });
    }

    if capacity < 1 {
        return Err(RegistryError::InvalidCapacity { capacity });
    }

    if price < Decimal::ZERO {
        return Err(RegistryError::NegativePrice { price });
    }

    Ok(())
}

/// Validated-on-create input for a new event
///
/// Values typically come straight from the CLI. `validate` enforces the
/// field rules that do not depend on other events; name uniqueness is
/// checked by the registry against the repository.
#[derive(Debug, Clone, PartialEq)]
pub struct NewEvent {
    pub name: String,
    pub location: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub capacity: u32,
    pub price: Decimal,
    pub description: String,
    pub sessions: Vec<String>,
}

impl NewEvent {
    /// Check the per-field rules for a new event
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The name is empty after trimming
    /// - The end date precedes the start date
    /// - The capacity is zero
    /// - The price is negative
    pub fn validate(&self) -> Result<(), RegistryError> {
        check_fields(
            &self.name,
            self.start_date,
            self.end_date,
            self.capacity,
            self.price,
        )
    }

    /// Build the stored event, trimming text fields
    pub fn into_event(self, id: EventId) -> Event {
        Event {
            id,
            name: self.name.trim().to_string(),
            location: self.location.trim().to_string(),
            start_date: self.start_date,
            end_date: self.end_date,
            capacity: self.capacity,
            price: self.price,
            description: self.description.trim().to_string(),
            sessions: self
                .sessions
                .into_iter()
                .map(|session| session.trim().to_string())
                .filter(|session| !session.is_empty())
                .collect(),
        }
    }
}
