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

//! Storage policies for acquired records.
//!
//! There are two policies, see [`SessionBuffer`] (bulk) and [`LatestSlot`]
//! (latest-only). Both have a fixed memory footprint that is decided at
//! compile time, so nothing is allocated while a session is running.

use crate::sample::AcquisitionRecord;

/// Common abstraction over a storage policy. Written exclusively by the
/// sampling step, read by the export path.
pub trait SampleStore {
    /// Stores a record. Returns `false` if the record was dropped.
    fn store(&mut self, record: AcquisitionRecord) -> bool;

    /// Logically clears the store for a new session. Memory is kept.
    fn reset(&mut self);

    /// All retained records, oldest first.
    fn records(&self) -> &[AcquisitionRecord];

    /// The most recently stored record, if any.
    fn latest(&self) -> Option<AcquisitionRecord> {
        self.records().last().copied()
    }

    /// Maximum number of records that can be retained.
    fn capacity(&self) -> usize;

    /// Returns `true` if the next record would be dropped.
    fn is_full(&self) -> bool {
        self.records().len() >= self.capacity()
    }
}

/// Bulk policy: bounded, append-only record store with capacity `N`.
///
/// Once full, further records of the same session are silently dropped. The
/// store never overwrites or reallocates.
#[derive(Debug, Clone)]
pub struct SessionBuffer<const N: usize> {
    records: heapless::Vec<AcquisitionRecord, N>,
    /// Records dropped since the last reset.
    dropped: usize,
}

impl<const N: usize> SessionBuffer<N> {
    /// Creates a new empty buffer.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            records: heapless::Vec::new(),
            dropped: 0,
        }
    }

    /// Appends a record if there is space left. Returns `false` (and drops the
    /// record) if the buffer is already full.
    #[inline]
    pub fn append(&mut self, record: AcquisitionRecord) -> bool {
        match self.records.push(record) {
            Ok(()) => true,
            Err(_) => {
                self.dropped += 1;
                false
            }
        }
    }

    /// Returns the number of records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns `true` if no record is stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Returns `true` if further records will be dropped.
    #[must_use]
    pub fn is_full(&self) -> bool {
        self.records.is_full()
    }

    /// Returns the number of records dropped since the last reset.
    #[must_use]
    pub const fn dropped(&self) -> usize {
        self.dropped
    }
}

impl<const N: usize> Default for SessionBuffer<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> SampleStore for SessionBuffer<N> {
    #[inline]
    fn store(&mut self, record: AcquisitionRecord) -> bool {
        self.append(record)
    }

    fn reset(&mut self) {
        self.records.clear();
        self.dropped = 0;
    }

    fn records(&self) -> &[AcquisitionRecord] {
        self.records.as_slice()
    }

    fn capacity(&self) -> usize {
        N
    }

    fn is_full(&self) -> bool {
        self.records.is_full()
    }
}

/// Latest-only policy: a single slot that is overwritten on every sample.
///
/// No history is retained. Used when a client continuously polls for the
/// current value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LatestSlot {
    slot: Option<AcquisitionRecord>,
}

impl LatestSlot {
    /// Creates a new empty slot.
    #[must_use]
    pub const fn new() -> Self {
        Self { slot: None }
    }

    /// Replaces the current record.
    #[inline]
    pub fn set(&mut self, record: AcquisitionRecord) {
        self.slot = Some(record);
    }

    /// Returns the current record.
    #[must_use]
    pub const fn get(&self) -> Option<AcquisitionRecord> {
        self.slot
    }
}

impl SampleStore for LatestSlot {
    #[inline]
    fn store(&mut self, record: AcquisitionRecord) -> bool {
        self.set(record);
        true
    }

    fn reset(&mut self) {
        self.slot = None;
    }

    fn records(&self) -> &[AcquisitionRecord] {
        self.slot.as_slice()
    }

    fn latest(&self) -> Option<AcquisitionRecord> {
        self.slot
    }

    fn capacity(&self) -> usize {
        1
    }

    fn is_full(&self) -> bool {
        false
    }
}
