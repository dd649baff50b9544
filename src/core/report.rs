//! Attendance reporting
//!
//! Read-only aggregation over the registration collection.

use crate::core::repository::Repository;
use crate::types::{AttendanceSummary, Event, RegistrationStatus};

/// Per-event attendance summaries in event creation order
///
/// The sequence is lazy: each summary is computed when it is pulled.
pub fn attendance_report(
    repository: &Repository,
) -> impl Iterator<Item = AttendanceSummary> + '_ {
    repository
        .events()
        .iter()
        .map(move |event| summarize(repository, event))
}

fn summarize(repository: &Repository, event: &Event) -> AttendanceSummary {
    let mut summary = AttendanceSummary {
        event_id: event.id,
        event_name: event.name.clone(),
        total: 0,
        confirmed: 0,
        waitlist: 0,
        checked_in: 0,
    };

    for registration in repository.registrations_for_event(event.id) {
        summary.total += 1;
        match registration.status {
            RegistrationStatus::Confirmed => summary.confirmed += 1,
            RegistrationStatus::Waitlist => summary.waitlist += 1,
        }
        if registration.checked_in {
            summary.checked_in += 1;
        }
    }

    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Registration;
    use chrono::{NaiveDate, Utc};
    use rust_decimal::Decimal;

    fn event(id: u32, name: &str) -> Event {
        let day = NaiveDate::from_ymd_opt(2026, 1, 10).unwrap();
        Event {
            id,
            name: name.to_string(),
            location: String::new(),
            start_date: day,
            end_date: day,
            capacity: 2,
            price: Decimal::ZERO,
            description: String::new(),
            sessions: Vec::new(),
        }
    }

    fn registration(id: u32, event_id: u32, status: RegistrationStatus, checked_in: bool) -> Registration {
        Registration {
            id,
            event_id,
            attendee_id: id,
            status,
            confirmation_code: format!("C{}", id),
            checked_in,
            checked_in_at: checked_in.then(Utc::now),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_report_counts_per_event_in_creation_order() {
        let repository = Repository::from_collections(
            vec![event(2, "Later id first"), event(1, "Second")],
            Vec::new(),
            vec![
                registration(1, 2, RegistrationStatus::Confirmed, true),
                registration(2, 2, RegistrationStatus::Confirmed, false),
                registration(3, 2, RegistrationStatus::Waitlist, false),
            ],
        );

        let report: Vec<AttendanceSummary> = attendance_report(&repository).collect();

        assert_eq!(report.len(), 2);
        assert_eq!(
            report[0],
            AttendanceSummary {
                event_id: 2,
                event_name: "Later id first".to_string(),
                total: 3,
                confirmed: 2,
                waitlist: 1,
                checked_in: 1,
            }
        );
        assert_eq!(report[1].total, 0);
        assert_eq!(report[1].event_name, "Second");
    }

    #[test]
    fn test_empty_repository_has_empty_report() {
        let repository = Repository::new();
        assert_eq!(attendance_report(&repository).count(), 0);
    }
}
