//! Asynchronous roster reader with batch interface
//!
//! Provides batch reading of roster entries for the async admission strategy.
//!
//! # Architecture
//!
//! ```text
//! CSV Reader → AsyncReader → Batches of RosterEntries
//!                  ↓
//!           csv_format module
//!           (RosterRecord, convert_roster_record)
//! ```

use crate::io::csv_format::{convert_roster_record, RosterRecord};
use crate::types::RosterEntry;
use csv_async::AsyncReaderBuilder;
use futures::io::AsyncRead;
use futures::stream::StreamExt;
use tracing::{error, warn};

/// Asynchronous roster reader
///
/// Reads the roster in batches; memory use is bounded by the batch size.
pub struct AsyncReader<R: AsyncRead + Unpin> {
    csv_reader: csv_async::AsyncDeserializer<R>,
    line_num: u64,
    finished: bool,
}

impl<R: AsyncRead + Unpin + Send + 'static> AsyncReader<R> {
    /// Create a new AsyncReader over roster CSV data
    pub fn new(reader: R) -> Self {
        let csv_reader = AsyncReaderBuilder::new()
            .flexible(true)
            .trim(csv_async::Trim::All)
            .create_deserializer(reader);

        Self {
            csv_reader,
            line_num: 1,
            finished: false,
        }
    }

    /// Read up to `batch_size` roster entries
    ///
    /// Malformed rows are logged and skipped. An I/O error is logged and
    /// ends the stream.
    ///
    /// # Returns
    ///
    /// The parsed entries, empty once the end of the roster is reached.
    pub async fn read_batch(&mut self, batch_size: usize) -> Vec<RosterEntry> {
        let mut batch = Vec::with_capacity(batch_size);
        if self.finished {
            return batch;
        }

        let mut records = self.csv_reader.deserialize::<RosterRecord>();

        while batch.len() < batch_size {
            let Some(next) = records.next().await else {
                self.finished = true;
                break;
            };
            self.line_num += 1;

            match next {
                Ok(record) => match convert_roster_record(record, self.line_num) {
                    Ok(entry) => batch.push(entry),
                    Err(e) => warn!(line = self.line_num, error = %e, "skipping roster row"),
                },
                Err(e) if matches!(e.kind(), csv_async::ErrorKind::Io(_)) => {
                    error!(line = self.line_num, error = %e, "roster read failed");
                    self.finished = true;
                    break;
                }
                Err(e) => warn!(line = self.line_num, error = %e, "skipping roster row"),
            }
        }

        batch
    }
}
