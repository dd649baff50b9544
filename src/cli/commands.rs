//! Command dispatch
//!
//! Each subcommand opens the registry on the configured data directory,
//! runs one operation and writes its result as CSV.

use super::args::{CliArgs, Command, RegisterArgs, RegisterBatchArgs, StrategyType};
use crate::config::RegistryConfig;
use crate::core::EventRegistry;
use crate::io::csv_format::{
    write_attendees_csv, write_check_in_csv, write_events_csv, write_issued_attendee_csv,
    write_registrations_csv, write_report_csv, RegistrationLine,
};
use crate::io::CsvStore;
use crate::strategy::create_strategy;
use crate::types::{Registration, RegistryError};
use std::io::Write;
use std::iter;

/// Run the parsed command, writing its CSV output to `output`
///
/// # Errors
///
/// Returns the error of the failed operation. Nothing is written to
/// `output` in that case.
pub fn run(args: &CliArgs, output: &mut dyn Write) -> Result<(), RegistryError> {
    let config = args.to_registry_config();
    let mut registry = EventRegistry::open(CsvStore::new(&config.data_dir));

    match &args.command {
        Command::CreateEvent(create) => {
            let event = registry.create_event(create.to_new_event())?;
            write_events_csv(iter::once((&event, 0)), output)
        }
        Command::ListEvents => write_events_csv(registry.event_overview(), output),
        Command::AddAttendee(add) => {
            let attendee = registry.create_attendee(add.to_new_attendee())?;
            write_issued_attendee_csv(&attendee, output)
        }
        Command::ListAttendees => write_attendees_csv(registry.repository().attendees(), output),
        Command::Register(register) => {
            let registration = register_one(&mut registry, register)?;
            write_registration(&registry, &registration, output)
        }
        Command::CheckIn { code } => {
            let result = registry.check_in(code)?;
            write_check_in_csv(&result, output)
        }
        Command::ListRegistrations => {
            write_registrations_csv(registry.registration_lines(), output)
        }
        Command::Report => write_report_csv(registry.attendance_report(), output),
        Command::RegisterBatch(batch) => register_batch(batch, &config, output),
    }
}

fn register_one(
    registry: &mut EventRegistry<CsvStore>,
    register: &RegisterArgs,
) -> Result<Registration, RegistryError> {
    match (&register.email, register.attendee) {
        (Some(email), _) => registry.register_by_email(register.event, email),
        (None, Some(attendee_id)) => registry.register(register.event, attendee_id),
        (None, None) => Err(RegistryError::empty_field("attendee")),
    }
}

fn write_registration(
    registry: &EventRegistry<CsvStore>,
    registration: &Registration,
    output: &mut dyn Write,
) -> Result<(), RegistryError> {
    let repository = registry.repository();
    let line = RegistrationLine {
        registration,
        attendee_name: repository
            .find_attendee_by_id(registration.attendee_id)
            .map_or("", |attendee| attendee.name.as_str()),
        event_name: repository
            .find_event_by_id(registration.event_id)
            .map_or("", |event| event.name.as_str()),
    };
    write_registrations_csv(iter::once(line), output)
}

fn register_batch(
    batch: &RegisterBatchArgs,
    config: &RegistryConfig,
    output: &mut dyn Write,
) -> Result<(), RegistryError> {
    let batch_config = match batch.strategy {
        StrategyType::Async => Some(batch.to_batch_config()),
        StrategyType::Sync => None,
    };
    let strategy = create_strategy(batch.strategy.clone(), batch_config);
    strategy.process(config, &batch.roster, output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use tempfile::TempDir;

    fn run_command(dir: &TempDir, args: &[&str]) -> Result<String, RegistryError> {
        let data_dir = dir.path().to_string_lossy().into_owned();
        let mut full = vec!["program", "--data-dir", data_dir.as_str()];
        full.extend_from_slice(args);

        let parsed = CliArgs::try_parse_from(full).unwrap();
        let mut output = Vec::new();
        run(&parsed, &mut output)?;
        Ok(String::from_utf8(output).unwrap())
    }

    fn seed(dir: &TempDir) {
        run_command(
            dir,
            &[
                "create-event",
                "--name",
                "RustConf",
                "--start",
                "2026-09-01",
                "--end",
                "2026-09-02",
                "--capacity",
                "1",
            ],
        )
        .unwrap();
        for (name, email) in [("Ada", "ada@example.com"), ("Bob", "bob@example.com")] {
            run_command(dir, &["add-attendee", "--name", name, "--email", email]).unwrap();
        }
    }

    #[test]
    fn test_create_event_prints_the_event() {
        let dir = TempDir::new().unwrap();
        let output = run_command(
            &dir,
            &[
                "create-event",
                "--name",
                "Meetup",
                "--start",
                "2026-03-01",
                "--end",
                "2026-03-01",
                "--capacity",
                "30",
                "--price",
                "5",
            ],
        )
        .unwrap();

        assert_eq!(
            output,
            "id,name,location,start_date,end_date,confirmed,capacity,price,sessions\n\
             1,Meetup,,2026-03-01,2026-03-01,0,30,5.00,\n"
        );
        assert!(dir.path().join("events.csv").exists());
    }

    #[test]
    fn test_register_check_in_and_report() {
        let dir = TempDir::new().unwrap();
        seed(&dir);

        let confirmed = run_command(&dir, &["register", "--event", "1", "--attendee", "1"]).unwrap();
        assert!(confirmed.contains(",Ada,RustConf,CONFIRMED,false"));
        let waitlisted =
            run_command(&dir, &["register", "--event", "1", "--email", "BOB@example.com"]).unwrap();
        assert!(waitlisted.contains(",Bob,RustConf,WAITLIST,false"));

        let code = confirmed
            .lines()
            .nth(1)
            .and_then(|line| line.split(',').next())
            .unwrap()
            .to_lowercase();
        let checked = run_command(&dir, &["check-in", code.as_str()]).unwrap();
        assert!(checked.contains(&code.to_uppercase()));

        let report = run_command(&dir, &["report"]).unwrap();
        assert_eq!(
            report,
            "event_id,event_name,total,confirmed,waitlist,checked_in\n1,RustConf,2,1,1,1\n"
        );

        let listing = run_command(&dir, &["list-events"]).unwrap();
        assert!(listing.contains("1,RustConf,,2026-09-01,2026-09-02,1,1,0.00,"));
    }

    #[test]
    fn test_errors_leave_output_empty() {
        let dir = TempDir::new().unwrap();
        seed(&dir);

        let result = run_command(&dir, &["register", "--event", "7", "--attendee", "1"]);
        assert_eq!(result, Err(RegistryError::event_not_found(7)));

        let result = run_command(&dir, &["check-in", "NOPE1234"]);
        assert_eq!(result, Err(RegistryError::code_not_found("NOPE1234")));

        let result = run_command(&dir, &["add-attendee", "--name", "Ada", "--email", "ADA@example.com"]);
        assert!(matches!(result, Err(RegistryError::DuplicateEmail { .. })));
    }

    #[test]
    fn test_attendee_listing_hides_pins() {
        let dir = TempDir::new().unwrap();
        seed(&dir);

        let output = run_command(&dir, &["list-attendees"]).unwrap();
        assert_eq!(
            output,
            "id,name,email,organization,dietary_notes\n\
             1,Ada,ada@example.com,,\n\
             2,Bob,bob@example.com,,\n"
        );
    }
}
