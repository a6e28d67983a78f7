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

//! Integer moving average over the most recent readings.

use core::fmt::{Debug, Formatter};
use ringbuffer::{ConstGenericRingBuffer, RingBuffer};

/// Moving average over the last `W` readings with `O(1)` cost per reading.
///
/// Keeps the window in a ringbuffer and a running sum next to it. The
/// average is calculated with integer division (truncating), as fixed-point
/// firmware does it. Until the window is filled, the average considers only
/// the readings pushed so far.
///
/// `W` must not be zero; this is checked at compile time when the filter is
/// created. The running sum is 64 bits wide, so it can't overflow for any
/// window that fits into memory.
pub struct MovingAverage<const W: usize> {
    window: ConstGenericRingBuffer<u16, W>,
    /// Invariant: sum of all values in `window`.
    sum: u64,
}

impl<const W: usize> MovingAverage<W> {
    const NON_EMPTY_WINDOW: () = assert!(W > 0, "the window must hold at least one reading");

    /// Creates a new, empty filter.
    #[must_use]
    pub fn new() -> Self {
        #[allow(clippy::let_unit_value)]
        let () = Self::NON_EMPTY_WINDOW;
        Self {
            window: ConstGenericRingBuffer::new(),
            sum: 0,
        }
    }

    /// Pushes a new reading into the window, replacing the oldest one once
    /// the window is full, and returns the updated average.
    #[inline]
    pub fn push(&mut self, value: u16) -> u16 {
        if self.window.is_full() {
            // index 0 is the oldest element
            self.sum -= u64::from(self.window[0]);
        }
        self.window.push(value);
        self.sum += u64::from(value);

        // len >= 1 at this point
        (self.sum / self.window.len() as u64) as u16
    }

    /// Returns the current average or `None` if nothing was pushed yet.
    #[must_use]
    pub fn average(&self) -> Option<u16> {
        if self.window.is_empty() {
            None
        } else {
            Some((self.sum / self.window.len() as u64) as u16)
        }
    }

    /// Returns how many readings are currently considered (`0..=W`).
    #[must_use]
    pub fn fill(&self) -> usize {
        self.window.len()
    }

    /// Returns the running sum of the window.
    #[must_use]
    pub const fn sum(&self) -> u64 {
        self.sum
    }

    /// Clears the window.
    pub fn reset(&mut self) {
        self.window.clear();
        self.sum = 0;
    }
}

impl<const W: usize> Default for MovingAverage<W> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const W: usize> Debug for MovingAverage<W> {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("MovingAverage")
            .field("window", &W)
            .field("fill", &self.fill())
            .field("sum", &self.sum)
            .finish()
    }
}
