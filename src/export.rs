/*
MIT License

Copyright (c) 2024 Philipp Schuster

Permission is hereby granted, free of charge, to any person obtaining a copy
of this software and associated documentation files (the "Software"), to deal
in the Software without restriction, including without limitation the rights
to use, copy, modify, merge, publish, distribute, sublicense, and/or sell
copies of the Software, and to permit persons to whom the Software is
furnished to do so, subject to the following conditions:

The above copyright notice and this permission notice shall be included in all
copies or substantial portions of the Software.

THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY,
FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE
AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER
LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM,
OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE
SOFTWARE.
*/

//! Renders the recorded data into the representations a client consumes.
//!
//! - [`CsvExport`]: the whole session as CSV text (bulk export)
//! - [`LatestExport`]: the most recent sample as a structured record for
//!   polling clients (latest-only export)
//!
//! Nothing here allocates. The CSV is written into any [`core::fmt::Write`]
//! sink and the structured record implements [`serde::Serialize`], so the
//! transport decides how to encode and send it.

use crate::config::CsvLayout;
use crate::sample::AcquisitionRecord;
use crate::session::RecorderState;
use core::fmt::{Display, Formatter, Write};
use serde::Serialize;

/// Writes the CSV header and one line per record into `out`.
///
/// Every line, including the last one, is terminated with `\n`.
pub fn write_csv<W: Write + ?Sized>(
    out: &mut W,
    layout: CsvLayout,
    records: &[AcquisitionRecord],
) -> core::fmt::Result {
    out.write_str(layout.header())?;
    for record in records {
        match layout {
            CsvLayout::RawAndFiltered => writeln!(
                out,
                "{},{},{}",
                record.elapsed_ms, record.raw, record.filtered
            )?,
            CsvLayout::RawOnly => writeln!(out, "{},{}", record.elapsed_ms, record.raw)?,
        }
    }
    Ok(())
}

/// Bulk export of a session as CSV text. Use its [`Display`] implementation
/// to render it.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum CsvExport<'a> {
    /// Text that was already rendered when the session was finalized.
    Rendered(&'a str),
    /// Records that are rendered on demand.
    Records {
        /// Column layout.
        layout: CsvLayout,
        /// Records in buffer order.
        records: &'a [AcquisitionRecord],
    },
}

impl<'a> CsvExport<'a> {
    /// Creates an export that renders the records on demand.
    #[must_use]
    pub const fn new(layout: CsvLayout, records: &'a [AcquisitionRecord]) -> Self {
        Self::Records { layout, records }
    }

    /// Creates an export from already rendered text.
    #[must_use]
    pub const fn rendered(text: &'a str) -> Self {
        Self::Rendered(text)
    }
}

impl Display for CsvExport<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Rendered(text) => f.write_str(text),
            Self::Records { layout, records } => write_csv(f, *layout, records),
        }
    }
}

/// Status reported to polling clients when there is no sample to show.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionStatus {
    /// No session is running.
    Stopped,
    /// A session is running but nothing was sampled yet.
    Waiting,
}

/// Latest-only export for polling clients.
///
/// Serializes to `{"time_ms":..,"raw":..,"filtered":..}` or to
/// `{"status":"stopped"}` / `{"status":"waiting"}`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum LatestExport {
    /// The most recent sample of the running session.
    Sample {
        /// Elapsed time since session start.
        time_ms: u32,
        /// The unfiltered reading.
        raw: u16,
        /// The moving average.
        filtered: u16,
    },
    /// There is no sample to report.
    Status {
        /// Why there is no sample.
        status: SessionStatus,
    },
}

impl LatestExport {
    /// Shorthand for the stopped status.
    pub const STOPPED: Self = Self::Status {
        status: SessionStatus::Stopped,
    };
    /// Shorthand for the waiting status.
    pub const WAITING: Self = Self::Status {
        status: SessionStatus::Waiting,
    };

    /// Builds the export from the recorder state and the latest record.
    #[must_use]
    pub const fn from_state(state: RecorderState, latest: Option<AcquisitionRecord>) -> Self {
        match (state, latest) {
            (RecorderState::Idle, _) => Self::STOPPED,
            (RecorderState::Recording, None) => Self::WAITING,
            (RecorderState::Recording, Some(record)) => Self::from_record(record),
        }
    }

    /// Copies all fields from one record.
    #[must_use]
    pub const fn from_record(record: AcquisitionRecord) -> Self {
        Self::Sample {
            time_ms: record.elapsed_ms,
            raw: record.raw,
            filtered: record.filtered,
        }
    }
}
