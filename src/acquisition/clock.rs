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

//! Interval gate that decides when the next sample is due.

/// Returns `true` if at least `interval_us` passed since `last_sample_us`.
///
/// Uses wrapping subtraction, so the result stays correct when the
/// microsecond counter rolls over between both points in time.
#[inline]
#[must_use]
pub const fn should_sample(now_us: u32, last_sample_us: u32, interval_us: u32) -> bool {
    now_us.wrapping_sub(last_sample_us) >= interval_us
}

/// Stateful sample clock that fires at most once per interval.
///
/// On each fire, the reference point is moved to the time of the poll and not
/// to the ideal tick. Therefore, the achieved period is never shorter than
/// the interval but may be longer if the caller polls late. Missed ticks are
/// skipped and not backfilled.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct SampleClock {
    // fixed during operation
    interval_us: u32,
    // mutated during operation
    last_sample_us: u32,
}

impl SampleClock {
    /// Creates a new clock. The first fire happens one interval after
    /// `now_us`.
    #[must_use]
    pub const fn new(interval_us: u32, now_us: u32) -> Self {
        Self {
            interval_us,
            last_sample_us: now_us,
        }
    }

    /// Moves the reference point to `now_us` without firing.
    pub fn restart(&mut self, now_us: u32) {
        self.last_sample_us = now_us;
    }

    /// Checks if a sample is due. If so, the reference point is updated and
    /// `true` is returned.
    #[inline]
    pub fn poll(&mut self, now_us: u32) -> bool {
        if should_sample(now_us, self.last_sample_us, self.interval_us) {
            self.last_sample_us = now_us;
            true
        } else {
            false
        }
    }

    /// Returns the time of the last fire (or of the last restart).
    #[must_use]
    pub const fn last_sample_us(&self) -> u32 {
        self.last_sample_us
    }

    /// Returns the interval (µs).
    #[must_use]
    pub const fn interval_us(&self) -> u32 {
        self.interval_us
    }
}
