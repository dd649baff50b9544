//! Read-only summary types produced by the reporting aggregator

use super::event::EventId;

/// Per-event attendance counts
///
/// `total` always equals `confirmed + waitlist`, and `checked_in` never
/// exceeds `confirmed`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttendanceSummary {
    pub event_id: EventId,
    pub event_name: String,
    pub total: usize,
    pub confirmed: usize,
    pub waitlist: usize,
    pub checked_in: usize,
}
