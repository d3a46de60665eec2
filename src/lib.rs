#![forbid(unsafe_code)]
#![deny(clippy::all, clippy::pedantic)]

mod errors;
mod period;

pub use errors::Error;

use chrono::{Local, TimeZone};
use csv::StringRecord;
use std::io::{Read, Write};
use tracing::{debug, trace};

/// Reads CSV rows and turns the `YYYY-MM` value in the first column of every
/// row after the header into Unix epoch seconds.
pub struct TimestampExtractor<Tz: TimeZone = Local> {
    tz: Tz,
    header: Option<StringRecord>,
}

impl Default for TimestampExtractor<Local> {
    fn default() -> Self {
        Self::local()
    }
}

impl TimestampExtractor<Local> {
    /// Extractor that interprets periods in the system time zone, so the same
    /// input yields different timestamps on differently configured machines.
    #[must_use]
    pub fn local() -> Self {
        Self::new(Local)
    }
}

impl<Tz: TimeZone> TimestampExtractor<Tz> {
    #[must_use]
    pub fn new(tz: Tz) -> Self {
        Self { tz, header: None }
    }

    /// The first row of the last run, kept only so it can be skipped.
    #[must_use]
    pub fn header(&self) -> Option<&StringRecord> {
        self.header.as_ref()
    }

    /// Reads `csv_input` as csv and writes one timestamp per line to `output`
    /// for every row but the first. Returns the number of timestamps written.
    ///
    /// Empty lines are rows without fields: one in first position is the
    /// header, anywhere else it fails the run.
    ///
    /// # Errors
    ///
    /// Stops at the first row that cannot be read, is empty, or whose first
    /// field is not a `%Y-%m` date, and at the first failed write. Lines
    /// written before the failure are left in `output`.
    pub fn process(
        &mut self,
        csv_input: impl Read,
        mut output: impl Write,
    ) -> Result<usize, Error> {
        // The csv reader drops empty lines, so they are recovered from the
        // line count. The trailing newline makes sure every row, the last one
        // included, ends on a line break that gets counted.
        let mut csv_reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .terminator(csv::Terminator::Any(b'\n'))
            .from_reader(csv_input.chain(&b"\n"[..]));

        self.header = None;
        let mut row = 0;
        let mut emitted = 0;
        let mut line = csv_reader.position().line();
        let mut record = StringRecord::new();

        while csv_reader
            .read_record(&mut record)
            .map_err(|e| Error::CSVRowReadFailure(e.to_string()))?
        {
            let next_line = csv_reader.position().line();
            let empty_lines = (next_line - line).saturating_sub(lines_spanned(&record));
            line = next_line;

            for _ in 0..empty_lines {
                row += 1;
                emitted += self.handle(row, StringRecord::new(), &mut output)?;
            }

            row += 1;
            let fields = strip_carriage_return(std::mem::take(&mut record));
            emitted += self.handle(row, fields, &mut output)?;
        }

        // minus the newline appended to the input
        let trailing_empty_lines = (csv_reader.position().line() - line).saturating_sub(1);
        for _ in 0..trailing_empty_lines {
            row += 1;
            emitted += self.handle(row, StringRecord::new(), &mut output)?;
        }

        output
            .flush()
            .map_err(|e| Error::OutputWriteFailure(e.to_string()))?;

        debug!(rows = row, emitted, "finished extracting timestamps");
        Ok(emitted)
    }

    /// Keeps the first row as the header, writes the timestamp of any other.
    /// Returns how many lines were written.
    fn handle(
        &mut self,
        row: usize,
        record: StringRecord,
        output: &mut impl Write,
    ) -> Result<usize, Error> {
        if row == 1 {
            self.header = Some(record);
            return Ok(0);
        }

        let timestamp = self.timestamp(row, &record)?;
        trace!(row, timestamp, "extracted timestamp");
        writeln!(output, "{timestamp}").map_err(|e| Error::OutputWriteFailure(e.to_string()))?;

        Ok(1)
    }

    fn timestamp(&self, row: usize, record: &StringRecord) -> Result<i64, Error> {
        let value = record.get(0).ok_or_else(|| {
            debug!(row, "empty row");
            Error::MissingDateField { row }
        })?;

        let naive = period::parse_period(value).map_err(|e| {
            debug!(row, value, error = %e, "unparseable date");
            Error::DateParseFailure {
                row,
                value: value.to_string(),
                reason: e.to_string(),
            }
        })?;

        period::to_epoch_seconds(&self.tz, &naive).ok_or_else(|| Error::DateParseFailure {
            row,
            value: value.to_string(),
            reason: "no such local time".to_string(),
        })
    }
}

/// Line breaks a record consumes: its terminator plus any inside quoted fields.
fn lines_spanned(record: &StringRecord) -> u64 {
    let quoted_newlines = record
        .iter()
        .map(|field| field.bytes().filter(|&b| b == b'\n').count())
        .sum::<usize>();

    1 + quoted_newlines as u64
}

/// Removes the `\r` a CRLF line ending leaves on the last field. A line that
/// held nothing but the line ending becomes an empty row.
fn strip_carriage_return(record: StringRecord) -> StringRecord {
    if !record.iter().last().is_some_and(|field| field.ends_with('\r')) {
        return record;
    }
    if record.len() == 1 && &record[0] == "\r" {
        return StringRecord::new();
    }

    let last = record.len() - 1;
    record
        .iter()
        .enumerate()
        .map(|(i, field)| if i == last { &field[..field.len() - 1] } else { field })
        .collect()
}
