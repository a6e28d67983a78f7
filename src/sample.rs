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

//! Module for the primitive data types flowing through the acquisition path.
//!
//! In a nutshell, this exports a restricted wrapper around raw ADC readings
//! with the guarantee to be in the valid input range, the record type that is
//! stored per sample, and the seams to the hardware: [`AnalogInput`] and
//! [`MonotonicClock`].

use core::fmt::{Display, Formatter};
use core::ops::RangeInclusive;
use thiserror::Error;

/// The raw reading is not in the input range of the ADC.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum InvalidSampleError {
    /// The reading and the valid range.
    #[error("reading {0} is not in the ADC input range {1:?}")]
    NotInRange(u16, RangeInclusive<u16>),
}

/// One reading of the analog input in range `0..=4095` (12-bit ADC).
#[derive(Copy, Clone, Debug, Default, PartialOrd, PartialEq, Ord, Eq)]
#[repr(transparent)]
pub struct RawSample(u16);

impl RawSample {
    /// Inclusive maximum value of a reading.
    pub const MAX: Self = Self(4095);
    /// Inclusive minimum value of a reading.
    pub const MIN: Self = Self(0);
    const VALID_RANGE: RangeInclusive<u16> = Self::MIN.0..=Self::MAX.0;

    /// Creates a sample from a reading and clamps it into the valid range.
    ///
    /// This never fails, which makes it suitable for the hot path.
    #[must_use]
    pub const fn saturating(value: u16) -> Self {
        if value > Self::MAX.0 {
            Self::MAX
        } else {
            Self(value)
        }
    }

    /// Returns the underlying raw value.
    pub const fn raw(self) -> u16 {
        self.0
    }
}

impl TryFrom<u16> for RawSample {
    type Error = InvalidSampleError;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        if Self::VALID_RANGE.contains(&value) {
            Ok(Self(value))
        } else {
            Err(InvalidSampleError::NotInRange(value, Self::VALID_RANGE))
        }
    }
}

impl From<RawSample> for u16 {
    fn from(value: RawSample) -> Self {
        value.0
    }
}

impl Display for RawSample {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A single acquired sample with time context.
///
/// All three fields are always written together, so readers never observe a
/// mixed triple.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct AcquisitionRecord {
    /// Time since the start of the session.
    pub elapsed_ms: u32,
    /// The unfiltered reading.
    pub raw: u16,
    /// The moving average including this reading.
    pub filtered: u16,
}

impl AcquisitionRecord {
    /// Creates a new record.
    #[must_use]
    pub const fn new(elapsed_ms: u32, raw: u16, filtered: u16) -> Self {
        Self {
            elapsed_ms,
            raw,
            filtered,
        }
    }
}

impl From<(u32, u16, u16)> for AcquisitionRecord {
    fn from((elapsed_ms, raw, filtered): (u32, u16, u16)) -> Self {
        Self::new(elapsed_ms, raw, filtered)
    }
}

/// A point in time as seen by the hardware timers.
///
/// Both counters are free-running and wrap around. They are only ever
/// compared via wrapping subtraction.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Timestamp {
    /// Microsecond counter. Wraps after ~71 minutes.
    pub micros: u32,
    /// Millisecond counter. Wraps after ~49 days.
    pub millis: u32,
}

impl Timestamp {
    /// Creates a timestamp from both timer values.
    #[must_use]
    pub const fn new(micros: u32, millis: u32) -> Self {
        Self { micros, millis }
    }

    /// Derives both counters from one wide microsecond value, truncated the
    /// same way 32-bit hardware timers are.
    #[must_use]
    pub const fn from_micros(micros: u64) -> Self {
        Self {
            micros: micros as u32,
            millis: (micros / 1000) as u32,
        }
    }
}

/// Abstraction over an analog input driver.
pub trait AnalogInput {
    /// Reads the current value of the given channel. Must not block longer
    /// than a single conversion.
    fn read(&mut self, channel: u8) -> u16;
}

/// Abstraction over the monotonic hardware timers.
pub trait MonotonicClock {
    /// Returns the current time.
    fn now(&self) -> Timestamp;
}
