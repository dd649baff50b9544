use crate::config::{RegistryConfig, DEFAULT_DATA_DIR, DEFAULT_TIMEOUT_MS};
use crate::strategy::BatchConfig;
use crate::types::{AttendeeId, EventId, NewAttendee, NewEvent};
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand, ValueEnum};
use rust_decimal::Decimal;
use std::path::PathBuf;
use std::str::FromStr;

/// Manage event registrations, admission and check-in
#[derive(Parser, Debug)]
#[command(name = "event-registry")]
#[command(about = "Manage event registrations, admission and check-in", long_about = None)]
pub struct CliArgs {
    /// Directory holding the CSV collections
    #[arg(
        long = "data-dir",
        value_name = "DIR",
        global = true,
        env = "EVENT_REGISTRY_DATA_DIR",
        default_value = DEFAULT_DATA_DIR
    )]
    pub data_dir: PathBuf,

    /// Deadline for a single operation, in milliseconds
    #[arg(
        long = "timeout-ms",
        value_name = "MS",
        global = true,
        env = "EVENT_REGISTRY_TIMEOUT_MS",
        default_value_t = DEFAULT_TIMEOUT_MS
    )]
    pub timeout_ms: u64,

    #[command(subcommand)]
    pub command: Command,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create a new event
    CreateEvent(CreateEventArgs),

    /// List events with seat usage
    ListEvents,

    /// Add a new attendee and print their access PIN
    AddAttendee(AddAttendeeArgs),

    /// List attendees
    ListAttendees,

    /// Register an attendee for an event
    Register(RegisterArgs),

    /// Register every attendee listed in a roster CSV (event,email)
    RegisterBatch(RegisterBatchArgs),

    /// Check in a registration by confirmation code
    CheckIn {
        /// Confirmation code, case-insensitive
        #[arg(value_name = "CODE", value_parser = non_empty)]
        code: String,
    },

    /// List registrations with attendee and event names
    ListRegistrations,

    /// Print per-event attendance counts
    Report,
}

#[derive(Args, Debug)]
pub struct CreateEventArgs {
    #[arg(long, value_parser = non_empty)]
    pub name: String,

    #[arg(long, default_value = "")]
    pub location: String,

    /// First day, YYYY-MM-DD
    #[arg(long, value_name = "DATE", value_parser = parse_date)]
    pub start: NaiveDate,

    /// Last day, YYYY-MM-DD
    #[arg(long, value_name = "DATE", value_parser = parse_date)]
    pub end: NaiveDate,

    /// Seats available for CONFIRMED registrations
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
    pub capacity: u32,

    #[arg(long, default_value = "0", value_parser = parse_price)]
    pub price: Decimal,

    #[arg(long, default_value = "")]
    pub description: String,

    /// Session title, may be repeated
    #[arg(long = "session", value_name = "TITLE")]
    pub sessions: Vec<String>,
}

impl CreateEventArgs {
    pub fn to_new_event(&self) -> NewEvent {
        NewEvent {
            name: self.name.clone(),
            location: self.location.clone(),
            start_date: self.start,
            end_date: self.end,
            capacity: self.capacity,
            price: self.price,
            description: self.description.clone(),
            sessions: self.sessions.clone(),
        }
    }
}

#[derive(Args, Debug)]
pub struct AddAttendeeArgs {
    #[arg(long, value_parser = non_empty)]
    pub name: String,

    #[arg(long, value_parser = non_empty)]
    pub email: String,

    #[arg(long, default_value = "")]
    pub organization: String,

    #[arg(long = "dietary-notes", default_value = "")]
    pub dietary_notes: String,
}

impl AddAttendeeArgs {
    pub fn to_new_attendee(&self) -> NewAttendee {
        NewAttendee {
            name: self.name.clone(),
            email: self.email.clone(),
            organization: self.organization.clone(),
            dietary_notes: self.dietary_notes.clone(),
        }
    }
}

#[derive(Args, Debug)]
pub struct RegisterArgs {
    #[arg(long)]
    pub event: EventId,

    /// Attendee identifier
    #[arg(long, required_unless_present = "email", conflicts_with = "email")]
    pub attendee: Option<AttendeeId>,

    /// Attendee email, case-insensitive
    #[arg(long, value_parser = non_empty)]
    pub email: Option<String>,
}

#[derive(Args, Debug)]
pub struct RegisterBatchArgs {
    /// Roster CSV file with `event,email` columns
    #[arg(value_name = "ROSTER")]
    pub roster: PathBuf,

    /// Processing strategy for the roster
    #[arg(
        long = "strategy",
        value_name = "STRATEGY",
        default_value = "async",
        help = "Processing strategy: 'sync' for sequential or 'async' for per-event parallel admission"
    )]
    pub strategy: StrategyType,

    /// Number of roster rows per batch (async mode only)
    #[arg(
        long = "batch-size",
        value_name = "SIZE",
        help = "Number of roster rows per batch (default: 1000)"
    )]
    pub batch_size: Option<usize>,

    /// Number of worker threads (async mode only)
    #[arg(
        long = "max-concurrent",
        value_name = "COUNT",
        help = "Number of worker threads (default: CPU cores)"
    )]
    pub max_concurrent_batches: Option<usize>,
}

/// Available strategies for batch admission
#[derive(Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum StrategyType {
    Sync,
    Async,
}

impl RegisterBatchArgs {
    /// Create a BatchConfig from the batch options
    ///
    /// Missing values take the defaults; zero values fall back to the
    /// defaults with a warning.
    pub fn to_batch_config(&self) -> BatchConfig {
        if self.batch_size.is_some() || self.max_concurrent_batches.is_some() {
            let default = BatchConfig::default();
            BatchConfig::new(
                self.batch_size.unwrap_or(default.batch_size),
                self.max_concurrent_batches
                    .unwrap_or(default.max_concurrent_batches),
            )
        } else {
            BatchConfig::default()
        }
    }
}

impl CliArgs {
    /// Build the runtime configuration from the global options
    pub fn to_registry_config(&self) -> RegistryConfig {
        RegistryConfig::new(self.data_dir.clone(), self.timeout_ms)
    }
}

fn non_empty(value: &str) -> Result<String, String> {
    if value.trim().is_empty() {
        Err("value must not be empty".to_string())
    } else {
        Ok(value.to_string())
    }
}

fn parse_date(value: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
        .map_err(|_| format!("invalid date '{}', expected YYYY-MM-DD", value))
}

fn parse_price(value: &str) -> Result<Decimal, String> {
    let price =
        Decimal::from_str(value.trim()).map_err(|_| format!("invalid price '{}'", value))?;
    if price < Decimal::ZERO {
        return Err(format!("price must not be negative, got {}", price));
    }
    Ok(price)
}
