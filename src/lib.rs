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

//! adc-recorder samples an analog input at a fixed rate, smooths every
//! reading with an integer moving average, and keeps the results for a remote
//! client, either as a bounded session exported as CSV or as a live stream of
//! the latest sample.
//!
//! The crate is `no_std` and doesn't need `alloc`. All buffers have a fixed
//! capacity chosen at compile time. The hardware is abstracted by two small
//! traits: [`AnalogInput`] for the ADC and [`MonotonicClock`] for the
//! microsecond/millisecond counters. The transport that carries requests is
//! not part of this crate; it only has to implement [`RequestSource`].
//!
//! # Example
//! ```rust
//! use adc_recorder::{AnalogInput, Recorder, RecorderConfig, SessionBuffer, Timestamp};
//!
//! struct Dummy;
//! impl AnalogInput for Dummy {
//!     fn read(&mut self, _channel: u8) -> u16 {
//!         2048
//!     }
//! }
//!
//! let mut recorder = Recorder::<SessionBuffer<3000>>::new(
//!     RecorderConfig::bounded_csv(),
//!     SessionBuffer::new(),
//! );
//! recorder.start(Timestamp::from_micros(0));
//! for ms in 1..=3001 {
//!     recorder.tick(Timestamp::from_micros(ms * 1000), &mut Dummy);
//! }
//! assert!(!recorder.is_recording());
//! assert_eq!(recorder.stats().samples, 3000);
//! ```

#![no_std]
#![deny(clippy::all)]
#![warn(clippy::nursery)]
#![allow(clippy::redundant_pub_crate)]
#![deny(missing_debug_implementations)]
#![deny(missing_docs)]

#[cfg(any(test, feature = "std"))]
extern crate std;

mod acquisition;
mod config;
mod event_loop;
mod export;
mod routes;
mod sample;
mod session;

#[cfg(feature = "std")]
pub mod stdlib;

#[cfg(test)]
mod test_utils;

pub use acquisition::{
    acquire, should_sample, LatestSlot, MovingAverage, SampleClock, SampleStore, SessionBuffer,
};
pub use config::{
    ConfigError, CsvLayout, RecorderConfig, SessionMode, ANALOG_CHANNEL, BUFFER_CAPACITY,
    FILTER_WINDOW, RECORD_DURATION_MS, SAMPLE_INTERVAL_US,
};
pub use event_loop::{EventLoop, Iteration, PendingRequest, RequestSource};
pub use export::{write_csv, CsvExport, LatestExport, SessionStatus};
pub use routes::{content_type, handle, AssetStore, Body, NoAssets, Response, Route};
pub use sample::{
    AcquisitionRecord, AnalogInput, InvalidSampleError, MonotonicClock, RawSample, Timestamp,
};
pub use session::{Recorder, RecorderState, RecordingSession, SessionStats, TickOutcome};
