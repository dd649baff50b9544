//! Event Registration CLI
//!
//! Command-line interface for managing events, attendees, registrations and
//! check-in. Collections live as CSV files in the data directory.
//!
//! # Usage
//!
//! ```bash
//! cargo run -- create-event --name RustConf --start 2026-09-01 --end 2026-09-03 --capacity 250
//! cargo run -- add-attendee --name Ada --email ada@example.com
//! cargo run -- register --event 1 --email ada@example.com
//! cargo run -- register-batch --strategy async --batch-size 2000 roster.csv > outcomes.csv
//! cargo run -- check-in AB12CD34
//! cargo run -- report > report.csv
//! ```
//!
//! Results are written to stdout as CSV; logs go to stderr. The log level is
//! controlled with `RUST_LOG` (default `info`).
//!
//! # Exit Codes
//!
//! - 0: Success
//! - 1: Error (validation failure, unknown record, conflict, I/O error, timeout)

use event_registration::cli;
use std::process;
use tracing_subscriber::EnvFilter;

fn main() {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = cli::parse_args();

    let mut output = std::io::stdout();
    if let Err(e) = cli::run(&args, &mut output) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}
