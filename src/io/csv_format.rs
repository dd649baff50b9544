//! CSV format handling for persisted collections, rosters and CLI output
//!
//! This module centralizes all CSV format concerns, providing:
//! - Flat row structures for the three persisted collections
//! - Conversion between rows and domain types (`FlatRecord`)
//! - Roster record conversion for batch admission
//! - Output serialization for listings, reports and admission outcomes
//!
//! All functions work on generic readers and writers for easy testing.

use crate::types::{
    AdmissionOutcome, AttendanceSummary, Attendee, AttendeeId, CheckInResult, EntityKind, Event,
    EventId, Registration, RegistrationId, RegistrationStatus, RegistryError, RosterEntry,
};
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::io::{Read, Write};
use std::str::FromStr;
use tracing::warn;

const DATE_FORMAT: &str = "%Y-%m-%d";
const SESSION_SEPARATOR: char = '|';
const SESSION_ESCAPE: char = '\\';

/// A domain record that persists as one flat CSV row
pub trait FlatRecord: Sized {
    /// Collection the record belongs to
    const KIND: EntityKind;

    /// Row shape written to and read from CSV
    type Row: Serialize + DeserializeOwned;

    fn to_row(&self) -> Self::Row;

    /// Rebuild the record, rejecting fields that do not parse
    fn from_row(row: Self::Row) -> Result<Self, String>;
}

/// Persisted event row
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct EventRow {
    pub id: EventId,
    pub name: String,
    pub location: String,
    pub start_date: String,
    pub end_date: String,
    pub capacity: u32,
    pub price: String,
    pub description: String,
    pub sessions: String,
}

/// Persisted attendee row
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct AttendeeRow {
    pub id: AttendeeId,
    pub name: String,
    pub email: String,
    pub organization: String,
    pub dietary_notes: String,
    pub pin: String,
}

/// Persisted registration row
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct RegistrationRow {
    pub id: RegistrationId,
    pub event_id: EventId,
    pub attendee_id: AttendeeId,
    pub status: RegistrationStatus,
    pub confirmation_code: String,
    pub checked_in: bool,
    pub checked_in_at: Option<String>,
    pub created_at: String,
}

fn parse_date(value: &str, field: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT)
        .map_err(|_| format!("Invalid {} '{}', expected YYYY-MM-DD", field, value))
}

/// Join session titles into one field, escaping separators inside titles
fn encode_sessions(sessions: &[String]) -> String {
    let mut field = String::new();
    for (index, session) in sessions.iter().enumerate() {
        if index > 0 {
            field.push(SESSION_SEPARATOR);
        }
        for c in session.chars() {
            if c == SESSION_SEPARATOR || c == SESSION_ESCAPE {
                field.push(SESSION_ESCAPE);
            }
            field.push(c);
        }
    }
    field
}

/// Split a sessions field written by `encode_sessions`
///
/// Blank titles are dropped. A trailing lone escape is kept as text.
fn decode_sessions(field: &str) -> Vec<String> {
    let mut sessions = Vec::new();
    let mut current = String::new();
    let mut chars = field.chars();

    while let Some(c) = chars.next() {
        match c {
            SESSION_ESCAPE => current.push(chars.next().unwrap_or(SESSION_ESCAPE)),
            SESSION_SEPARATOR => sessions.push(std::mem::take(&mut current)),
            _ => current.push(c),
        }
    }
    sessions.push(current);

    sessions.retain(|session| !session.is_empty());
    sessions
}

fn parse_timestamp(value: &str, field: &str) -> Result<DateTime<Utc>, String> {
    DateTime::parse_from_rfc3339(value.trim())
        .map(|ts| ts.with_timezone(&Utc))
        .map_err(|_| format!("Invalid {} '{}'", field, value))
}

impl FlatRecord for Event {
    const KIND: EntityKind = EntityKind::Event;
    type Row = EventRow;

    fn to_row(&self) -> EventRow {
        EventRow {
            id: self.id,
            name: self.name.clone(),
            location: self.location.clone(),
            start_date: self.start_date.format(DATE_FORMAT).to_string(),
            end_date: self.end_date.format(DATE_FORMAT).to_string(),
            capacity: self.capacity,
            price: self.price.to_string(),
            description: self.description.clone(),
            sessions: encode_sessions(&self.sessions),
        }
    }

    fn from_row(row: EventRow) -> Result<Self, String> {
        let start_date = parse_date(&row.start_date, "start_date")?;
        let end_date = parse_date(&row.end_date, "end_date")?;
        let price = Decimal::from_str(row.price.trim())
            .map_err(|_| format!("Invalid price '{}' for event {}", row.price, row.id))?;
        let event = Event {
            id: row.id,
            name: row.name,
            location: row.location,
            start_date,
            end_date,
            capacity: row.capacity,
            price,
            description: row.description,
            sessions: decode_sessions(&row.sessions),
        };

        event
            .validate()
            .map_err(|e| format!("Event {}: {}", event.id, e))?;
        Ok(event)
    }
}

impl FlatRecord for Attendee {
    const KIND: EntityKind = EntityKind::Attendee;
    type Row = AttendeeRow;

    fn to_row(&self) -> AttendeeRow {
        AttendeeRow {
            id: self.id,
            name: self.name.clone(),
            email: self.email.clone(),
            organization: self.organization.clone(),
            dietary_notes: self.dietary_notes.clone(),
            pin: self.pin.clone(),
        }
    }

    fn from_row(row: AttendeeRow) -> Result<Self, String> {
        if row.email.trim().is_empty() {
            return Err(format!("Attendee {} has no email", row.id));
        }
        Ok(Attendee {
            id: row.id,
            name: row.name,
            email: row.email,
            organization: row.organization,
            dietary_notes: row.dietary_notes,
            pin: row.pin,
        })
    }
}

impl FlatRecord for Registration {
    const KIND: EntityKind = EntityKind::Registration;
    type Row = RegistrationRow;

    fn to_row(&self) -> RegistrationRow {
        RegistrationRow {
            id: self.id,
            event_id: self.event_id,
            attendee_id: self.attendee_id,
            status: self.status,
            confirmation_code: self.confirmation_code.clone(),
            checked_in: self.checked_in,
            checked_in_at: self.checked_in_at.map(|ts| ts.to_rfc3339()),
            created_at: self.created_at.to_rfc3339(),
        }
    }

    fn from_row(row: RegistrationRow) -> Result<Self, String> {
        let checked_in_at = match row.checked_in_at.as_deref() {
            Some(value) if !value.trim().is_empty() => {
                Some(parse_timestamp(value, "checked_in_at")?)
            }
            _ => None,
        };
        let created_at = parse_timestamp(&row.created_at, "created_at")?;

        Ok(Registration {
            id: row.id,
            event_id: row.event_id,
            attendee_id: row.attendee_id,
            status: row.status,
            confirmation_code: row.confirmation_code,
            checked_in: row.checked_in,
            checked_in_at,
            created_at,
        })
    }
}

/// Read every parseable record of a collection
///
/// Rows that fail to deserialize or convert are logged and skipped, so a
/// damaged row never hides the rest of the collection.
///
/// # Errors
///
/// Returns an I/O error if the underlying reader fails.
pub fn read_records<R: FlatRecord, I: Read>(input: I) -> Result<Vec<R>, RegistryError> {
    let mut reader = csv::ReaderBuilder::new().from_reader(input);
    let mut records = Vec::new();

    for (index, row) in reader.deserialize::<R::Row>().enumerate() {
        // header is line 1
        let line = index + 2;
        let row = match row {
            Ok(row) => row,
            Err(e) if e.is_io_error() => return Err(e.into()),
            Err(e) => {
                warn!(
                    collection = R::KIND.file_name(),
                    line,
                    error = %e,
                    "skipping malformed row"
                );
                continue;
            }
        };

        match R::from_row(row) {
            Ok(record) => records.push(record),
            Err(e) => warn!(
                collection = R::KIND.file_name(),
                line,
                error = %e,
                "skipping unreadable record"
            ),
        }
    }

    Ok(records)
}

/// Write a whole collection, header included
///
/// # Errors
///
/// Returns an I/O error if serialization or the underlying writer fails.
pub fn write_records<R: FlatRecord, W: Write>(
    records: &[R],
    output: W,
) -> Result<(), RegistryError> {
    let mut writer = csv::Writer::from_writer(output);

    for record in records {
        writer.serialize(record.to_row())?;
    }

    writer.flush()?;
    Ok(())
}

/// CSV record structure for roster deserialization
///
/// Matches the roster format with columns: event, email
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct RosterRecord {
    pub event: String,
    pub email: String,
}

/// Convert a RosterRecord to a RosterEntry
///
/// # Arguments
///
/// * `record` - The deserialized roster row
/// * `line` - Line number of the row in the roster file
///
/// # Returns
///
/// Result containing either:
/// - Ok(RosterEntry) - Successfully converted entry
/// - Err(String) - Error message describing the conversion failure
pub fn convert_roster_record(record: RosterRecord, line: u64) -> Result<RosterEntry, String> {
    let event_id = record
        .event
        .trim()
        .parse::<EventId>()
        .map_err(|_| format!("Invalid event id '{}'", record.event))?;

    let email = record.email.trim();
    if email.is_empty() {
        return Err(format!("Missing email for event {}", event_id));
    }

    Ok(RosterEntry {
        line,
        event_id,
        email: email.to_string(),
    })
}

/// Write the per-event attendance report
///
/// Columns: event_id, event_name, total, confirmed, waitlist, checked_in
///
/// # Errors
///
/// Returns an I/O error if writing fails.
pub fn write_report_csv<I>(summaries: I, output: &mut dyn Write) -> Result<(), RegistryError>
where
    I: IntoIterator<Item = AttendanceSummary>,
{
    let mut writer = csv::Writer::from_writer(output);
    writer.write_record([
        "event_id",
        "event_name",
        "total",
        "confirmed",
        "waitlist",
        "checked_in",
    ])?;

    for summary in summaries {
        writer.write_record(&[
            summary.event_id.to_string(),
            summary.event_name,
            summary.total.to_string(),
            summary.confirmed.to_string(),
            summary.waitlist.to_string(),
            summary.checked_in.to_string(),
        ])?;
    }

    writer.flush()?;
    Ok(())
}

/// Write the event listing with seat usage
///
/// Each item pairs an event with its current CONFIRMED count.
///
/// # Errors
///
/// Returns an I/O error if writing fails.
pub fn write_events_csv<'a, I>(events: I, output: &mut dyn Write) -> Result<(), RegistryError>
where
    I: IntoIterator<Item = (&'a Event, usize)>,
{
    let mut writer = csv::Writer::from_writer(output);
    writer.write_record([
        "id",
        "name",
        "location",
        "start_date",
        "end_date",
        "confirmed",
        "capacity",
        "price",
        "sessions",
    ])?;

    for (event, confirmed) in events {
        writer.write_record(&[
            event.id.to_string(),
            event.name.clone(),
            event.location.clone(),
            event.start_date.format(DATE_FORMAT).to_string(),
            event.end_date.format(DATE_FORMAT).to_string(),
            confirmed.to_string(),
            event.capacity.to_string(),
            format!("{:.2}", event.price),
            event.sessions.join("; "),
        ])?;
    }

    writer.flush()?;
    Ok(())
}

/// Write the attendee listing. PINs are never printed.
///
/// # Errors
///
/// Returns an I/O error if writing fails.
pub fn write_attendees_csv(
    attendees: &[Attendee],
    output: &mut dyn Write,
) -> Result<(), RegistryError> {
    let mut writer = csv::Writer::from_writer(output);
    writer.write_record(["id", "name", "email", "organization", "dietary_notes"])?;

    for attendee in attendees {
        writer.write_record([
            attendee.id.to_string().as_str(),
            attendee.name.as_str(),
            attendee.email.as_str(),
            attendee.organization.as_str(),
            attendee.dietary_notes.as_str(),
        ])?;
    }

    writer.flush()?;
    Ok(())
}

/// A registration joined with the names it refers to
#[derive(Debug, Clone, PartialEq)]
pub struct RegistrationLine<'a> {
    pub registration: &'a Registration,
    pub attendee_name: &'a str,
    pub event_name: &'a str,
}

/// Write the registration listing
///
/// # Errors
///
/// Returns an I/O error if writing fails.
pub fn write_registrations_csv<'a, I>(
    lines: I,
    output: &mut dyn Write,
) -> Result<(), RegistryError>
where
    I: IntoIterator<Item = RegistrationLine<'a>>,
{
    let mut writer = csv::Writer::from_writer(output);
    writer.write_record([
        "confirmation_code",
        "attendee",
        "event",
        "status",
        "checked_in",
    ])?;

    for line in lines {
        writer.write_record([
            line.registration.confirmation_code.as_str(),
            line.attendee_name,
            line.event_name,
            line.registration.status.as_str(),
            if line.registration.checked_in {
                "true"
            } else {
                "false"
            },
        ])?;
    }

    writer.flush()?;
    Ok(())
}

/// Write batch admission outcomes ordered by roster line
///
/// Columns: line, event, email, status, confirmation_code, error
///
/// # Errors
///
/// Returns an I/O error if writing fails.
pub fn write_admissions_csv(
    outcomes: &[AdmissionOutcome],
    output: &mut dyn Write,
) -> Result<(), RegistryError> {
    let mut writer = csv::Writer::from_writer(output);
    writer.write_record([
        "line",
        "event",
        "email",
        "status",
        "confirmation_code",
        "error",
    ])?;

    let mut sorted: Vec<&AdmissionOutcome> = outcomes.iter().collect();
    sorted.sort_by_key(|outcome| outcome.entry.line);

    for outcome in sorted {
        let (status, code, error) = match &outcome.result {
            Ok(registration) => (
                registration.status.as_str().to_string(),
                registration.confirmation_code.clone(),
                String::new(),
            ),
            Err(e) => ("REJECTED".to_string(), String::new(), e.to_string()),
        };
        writer.write_record(&[
            outcome.entry.line.to_string(),
            outcome.entry.event_id.to_string(),
            outcome.entry.email.clone(),
            status,
            code,
            error,
        ])?;
    }

    writer.flush()?;
    Ok(())
}

/// Write a newly created attendee together with the issued PIN
///
/// This is the only output that ever shows a PIN.
///
/// # Errors
///
/// Returns an I/O error if writing fails.
pub fn write_issued_attendee_csv(
    attendee: &Attendee,
    output: &mut dyn Write,
) -> Result<(), RegistryError> {
    let mut writer = csv::Writer::from_writer(output);
    writer.write_record(["id", "name", "email", "pin"])?;
    writer.write_record([
        attendee.id.to_string().as_str(),
        attendee.name.as_str(),
        attendee.email.as_str(),
        attendee.pin.as_str(),
    ])?;
    writer.flush()?;
    Ok(())
}

/// Write a successful check-in
///
/// # Errors
///
/// Returns an I/O error if writing fails.
pub fn write_check_in_csv(
    result: &CheckInResult,
    output: &mut dyn Write,
) -> Result<(), RegistryError> {
    let mut writer = csv::Writer::from_writer(output);
    writer.write_record(["confirmation_code", "event_id", "attendee_id", "checked_in_at"])?;
    writer.write_record(&[
        result.confirmation_code.clone(),
        result.event_id.to_string(),
        result.attendee_id.to_string(),
        result.checked_in_at.to_rfc3339(),
    ])?;
    writer.flush()?;
    Ok(())
}
