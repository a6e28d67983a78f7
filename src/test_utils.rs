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

//! Test doubles for the hardware seams.

use crate::routes::AssetStore;
use crate::sample::{AnalogInput, MonotonicClock, Timestamp};
use std::cell::Cell;
use std::rc::Rc;
use std::vec::Vec;

/// Analog input that replays a fixed sequence of readings. Once exhausted,
/// the last reading repeats.
#[derive(Debug, Clone)]
pub struct ScriptedInput {
    readings: Vec<u16>,
    reads: usize,
    channels: Vec<u8>,
}

impl ScriptedInput {
    pub fn new(readings: impl IntoIterator<Item = u16>) -> Self {
        let readings = readings.into_iter().collect::<Vec<_>>();
        assert!(!readings.is_empty(), "needs at least one reading");
        Self {
            readings,
            reads: 0,
            channels: Vec::new(),
        }
    }

    pub fn constant(value: u16) -> Self {
        Self::new([value])
    }

    /// Number of conversions performed so far.
    pub const fn reads(&self) -> usize {
        self.reads
    }

    /// Channels of all conversions, in order.
    pub fn channels_read(&self) -> &[u8] {
        &self.channels
    }
}

impl AnalogInput for ScriptedInput {
    fn read(&mut self, channel: u8) -> u16 {
        let index = self.reads.min(self.readings.len() - 1);
        self.reads += 1;
        self.channels.push(channel);
        self.readings[index]
    }
}

/// Clock that only moves when told so. Clones share the same time.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    micros: Rc<Cell<u64>>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn advance_micros(&self, micros: u64) {
        self.micros.set(self.micros.get() + micros);
    }
}

impl MonotonicClock for ManualClock {
    fn now(&self) -> Timestamp {
        Timestamp::from_micros(self.micros.get())
    }
}

/// Asset store over a static table.
#[derive(Debug, Clone, Copy)]
pub struct StaticAssets {
    files: &'static [(&'static str, &'static [u8])],
}

impl StaticAssets {
    pub const fn new(files: &'static [(&'static str, &'static [u8])]) -> Self {
        Self { files }
    }
}

impl AssetStore for StaticAssets {
    fn get(&self, path: &str) -> Option<&[u8]> {
        self.files
            .iter()
            .find(|(name, _)| *name == path)
            .map(|(_, content)| *content)
    }
}
