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

//! The acquisition layer: everything that happens in a single sampling step.
//!
//! A sampling step reads the analog input, passes the reading through the
//! [`MovingAverage`], and hands the resulting [`AcquisitionRecord`] to a
//! [`SampleStore`]. Each step is `O(1)`, never allocates, and always runs to
//! completion.
//!
//! This module only operates on the data path, without knowing anything
//! about sessions or the request side.

use crate::sample::{AcquisitionRecord, AnalogInput, InvalidSampleError, RawSample};

pub mod clock;
pub mod moving_average;
pub mod store;

pub use clock::{should_sample, SampleClock};
pub use moving_average::MovingAverage;
pub use store::{LatestSlot, SampleStore, SessionBuffer};

/// Reads one value from the input and produces the record for it.
///
/// Readings outside the ADC range are clamped, so a single bad reading never
/// stops the acquisition.
#[inline]
pub fn acquire<I: AnalogInput + ?Sized, const W: usize>(
    input: &mut I,
    channel: u8,
    filter: &mut MovingAverage<W>,
    elapsed_ms: u32,
) -> AcquisitionRecord {
    let reading = input.read(channel);
    let raw = RawSample::try_from(reading).unwrap_or_else(|e: InvalidSampleError| {
        log::warn!("{e}; clamping");
        RawSample::saturating(reading)
    });
    let filtered = filter.push(raw.raw());
    AcquisitionRecord::new(elapsed_ms, raw.raw(), filtered)
}
