//! Property tests for admission and check-in
//!
//! Random sequences of registrations and check-ins are replayed against an
//! in-memory registry. After every sequence:
//! - no event holds more CONFIRMED registrations than its capacity
//! - no (event, attendee) pair is registered twice
//! - confirmation codes are distinct
//! - only CONFIRMED registrations are checked in

use chrono::NaiveDate;
use event_registration::{
    EventRegistry, MemoryStore, NewAttendee, NewEvent, RegistrationStatus, RegistryError,
};
use proptest::prelude::*;
use rust_decimal::Decimal;
use std::collections::HashSet;

const ATTENDEES: u32 = 6;

#[derive(Debug, Clone)]
enum Op {
    Register { event: u32, attendee: u32 },
    CheckIn { nth: usize },
}

fn op_strategy(events: u32) -> impl Strategy<Value = Op> {
    prop_oneof![
        3 => (1..=events + 1, 1..=ATTENDEES + 1)
            .prop_map(|(event, attendee)| Op::Register { event, attendee }),
        1 => (0usize..32).prop_map(|nth| Op::CheckIn { nth }),
    ]
}

fn scenario() -> impl Strategy<Value = (Vec<u32>, Vec<Op>)> {
    prop::collection::vec(1u32..4, 1..4).prop_flat_map(|capacities| {
        let ops = prop::collection::vec(op_strategy(capacities.len() as u32), 0..60);
        (Just(capacities), ops)
    })
}

fn seeded(capacities: &[u32]) -> EventRegistry<MemoryStore> {
    let mut registry = EventRegistry::open(MemoryStore::new());
    let day = NaiveDate::from_ymd_opt(2026, 6, 1).unwrap();
    for (i, &capacity) in capacities.iter().enumerate() {
        registry
            .create_event(NewEvent {
                name: format!("Event {}", i + 1),
                location: String::new(),
                start_date: day,
                end_date: day,
                capacity,
                price: Decimal::ZERO,
                description: String::new(),
                sessions: Vec::new(),
            })
            .unwrap();
    }
    for i in 1..=ATTENDEES {
        registry
            .create_attendee(NewAttendee {
                name: format!("Attendee {}", i),
                email: format!("attendee{}@example.com", i),
                organization: String::new(),
                dietary_notes: String::new(),
            })
            .unwrap();
    }
    registry
}

proptest! {
    #[test]
    fn admission_and_check_in_hold_invariants((capacities, ops) in scenario()) {
        let mut registry = seeded(&capacities);

        for op in ops {
            match op {
                Op::Register { event, attendee } => {
                    let before = registry.repository().registrations().len();
                    match registry.register(event, attendee) {
                        Ok(registration) => {
                            prop_assert_eq!(registry.repository().registrations().len(), before + 1);
                            prop_assert_eq!(registration.event_id, event);
                        }
                        Err(e) => {
                            prop_assert!(matches!(
                                e,
                                RegistryError::EventNotFound { .. }
                                    | RegistryError::AttendeeNotFound { .. }
                                    | RegistryError::DuplicateRegistration { .. }
                            ), "unexpected register error: {:?}", e);
                            prop_assert_eq!(registry.repository().registrations().len(), before);
                        }
                    }
                }
                Op::CheckIn { nth } => {
                    let Some(target) = registry.repository().registrations().get(nth).cloned() else {
                        continue;
                    };
                    let result = registry.check_in(&target.confirmation_code);
                    match (target.status, target.checked_in) {
                        (RegistrationStatus::Confirmed, false) => prop_assert!(result.is_ok()),
                        (_, true) => prop_assert!(matches!(result, Err(RegistryError::AlreadyCheckedIn { .. })), "expected AlreadyCheckedIn"),
                        (RegistrationStatus::Waitlist, false) => {
                            prop_assert!(matches!(result, Err(RegistryError::NotConfirmed { .. })), "expected NotConfirmed")
                        }
                    }
                }
            }
        }

        let repository = registry.repository();
        for event in repository.events() {
            prop_assert!(repository.confirmed_count(event.id) <= event.capacity as usize);
        }

        let registrations = repository.registrations();
        let pairs: HashSet<_> = registrations.iter().map(|r| (r.event_id, r.attendee_id)).collect();
        prop_assert_eq!(pairs.len(), registrations.len());

        let codes: HashSet<_> = registrations.iter().map(|r| r.confirmation_code.as_str()).collect();
        prop_assert_eq!(codes.len(), registrations.len());

        for registration in registrations {
            if registration.checked_in {
                prop_assert_eq!(registration.status, RegistrationStatus::Confirmed);
                prop_assert!(registration.checked_in_at.is_some());
            }
        }
    }
}
