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

//! Recording sessions: the state machine that decides whether new samples
//! are accepted, when the store is reset, and when a session ends.
//!
//! See [`Recorder`].

use crate::acquisition::{acquire, MovingAverage, SampleClock, SampleStore};
use crate::config::{RecorderConfig, SessionMode, FILTER_WINDOW};
use crate::export::{CsvExport, LatestExport};
use crate::sample::{AcquisitionRecord, AnalogInput, Timestamp};

/// State of a [`Recorder`].
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum RecorderState {
    /// No session is running. Initial state.
    #[default]
    Idle,
    /// A session is running and samples are accepted.
    Recording,
}

/// Bookkeeping of the current (or last) session.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct RecordingSession {
    state: RecorderState,
    /// Value of the millisecond counter when the session started.
    start_ms: u32,
    clock: SampleClock,
}

impl RecordingSession {
    const fn new(interval_us: u32) -> Self {
        Self {
            state: RecorderState::Idle,
            start_ms: 0,
            clock: SampleClock::new(interval_us, 0),
        }
    }

    /// Returns the state.
    #[must_use]
    pub const fn state(&self) -> RecorderState {
        self.state
    }

    /// Returns the millisecond counter value at session start.
    #[must_use]
    pub const fn start_ms(&self) -> u32 {
        self.start_ms
    }

    /// Returns the microsecond counter value of the last sample (or of the
    /// session start, if nothing was sampled yet).
    #[must_use]
    pub const fn last_sample_us(&self) -> u32 {
        self.clock.last_sample_us()
    }
}

/// What a single [`Recorder::tick`] did.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum TickOutcome {
    /// No session is running.
    Idle,
    /// A session is running but no sample was due.
    Waiting,
    /// A sample was acquired and stored.
    Sampled(AcquisitionRecord),
    /// A sample was due but the store was full. The input is not read and
    /// the filter is left untouched.
    Dropped {
        /// Elapsed time of the skipped sample.
        elapsed_ms: u32,
    },
    /// The bounded session expired and was finalized.
    Finished {
        /// Number of samples stored during the session.
        samples: usize,
    },
}

/// Summary of the current (or last) session.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct SessionStats {
    /// Samples stored during the session. With a [`LatestSlot`], this counts
    /// every overwrite, not the single retained record.
    ///
    /// [`LatestSlot`]: crate::LatestSlot
    pub samples: usize,
    /// Records the store refused.
    pub dropped: usize,
    /// Elapsed time of the most recent sample.
    pub elapsed_ms: u32,
}

/// Explicit context of the acquisition core: session state, smoothing filter,
/// and sample store.
///
/// Everything is mutated exclusively by [`Self::tick`] and the commands
/// ([`Self::start`], [`Self::stop`]). The export path only reads. As the
/// whole recorder lives on a single thread, every read observes the state
/// left by the last completed sampling step.
#[derive(Debug)]
pub struct Recorder<S: SampleStore, const W: usize = FILTER_WINDOW> {
    // read-only properties
    config: RecorderConfig,

    // mutable properties
    session: RecordingSession,
    filter: MovingAverage<W>,
    store: S,
    /// Whether the store holds a finalized session that can be exported.
    finalized: bool,
    stats: SessionStats,
    #[cfg(feature = "std")]
    csv_cache: Option<std::string::String>,
}

impl<S: SampleStore, const W: usize> Recorder<S, W> {
    /// Creates a new idle recorder.
    pub fn new(config: RecorderConfig, store: S) -> Self {
        if let Some(expected) = config.expected_samples() {
            if store.capacity() < expected {
                log::warn!(
                    "A session produces up to {expected} samples but the store only holds {}; the rest is dropped.",
                    store.capacity()
                );
            }
        }

        Self {
            config,
            session: RecordingSession::new(config.sample_interval_us()),
            filter: MovingAverage::new(),
            store,
            finalized: false,
            stats: SessionStats::default(),
            #[cfg(feature = "std")]
            csv_cache: None,
        }
    }

    /// Starts a new session if idle. Resets the store and the session clock.
    ///
    /// Returns `false` and does nothing if a session is already running.
    pub fn start(&mut self, now: Timestamp) -> bool {
        if self.is_recording() {
            log::debug!("start: already recording");
            return false;
        }

        self.store.reset();
        self.session.start_ms = now.millis;
        self.session.clock.restart(now.micros);
        self.session.state = RecorderState::Recording;
        self.finalized = false;
        self.stats = SessionStats::default();
        #[cfg(feature = "std")]
        {
            self.csv_cache = None;
        }

        log::debug!("start: new session at {} ms", now.millis);
        true
    }

    /// Stops a running session. The captured data stays readable and the
    /// CSV export is finalized with what was captured so far.
    ///
    /// Bounded sessions normally end on their own. Stopping one early is an
    /// extension for clients that want to abort a capture; the data captured
    /// up to this point is kept and exported.
    ///
    /// Returns `false` and does nothing if no session is running.
    pub fn stop(&mut self) -> bool {
        if !self.is_recording() {
            log::debug!("stop: not recording");
            return false;
        }
        self.finalize();
        log::debug!("stop: session stopped after {} samples", self.stats.samples);
        true
    }

    /// Drives the session. Should be called in every iteration of the outer
    /// loop; a sample is only taken when the sample clock fires.
    ///
    /// In [`SessionMode::Bounded`], samples are only taken while the elapsed
    /// time is within the duration, and the session is finalized as soon as
    /// the elapsed time exceeds it.
    pub fn tick<I: AnalogInput + ?Sized>(&mut self, now: Timestamp, input: &mut I) -> TickOutcome {
        if !self.is_recording() {
            return TickOutcome::Idle;
        }

        let elapsed_ms = now.millis.wrapping_sub(self.session.start_ms);
        let (in_window, expired) = match self.config.mode() {
            SessionMode::Bounded { duration_ms } => {
                (elapsed_ms <= duration_ms, elapsed_ms > duration_ms)
            }
            SessionMode::Continuous => (true, false),
        };

        let mut outcome = TickOutcome::Waiting;
        if in_window && self.session.clock.poll(now.micros) {
            outcome = self.sample(elapsed_ms, input);
        }

        if expired {
            self.finalize();
            log::info!(
                "Session finished: {} samples, {} dropped",
                self.stats.samples,
                self.stats.dropped
            );
            return TickOutcome::Finished {
                samples: self.stats.samples,
            };
        }

        outcome
    }

    /// The sampling step: acquire, filter, store.
    ///
    /// A full store skips the whole step, so readings that are never stored
    /// don't reach the filter either.
    #[inline]
    fn sample<I: AnalogInput + ?Sized>(&mut self, elapsed_ms: u32, input: &mut I) -> TickOutcome {
        self.stats.elapsed_ms = elapsed_ms;
        if self.store.is_full() {
            return self.drop_sample(elapsed_ms);
        }

        let record = acquire(input, self.config.channel(), &mut self.filter, elapsed_ms);
        if self.store.store(record) {
            self.stats.samples += 1;
            TickOutcome::Sampled(record)
        } else {
            self.drop_sample(elapsed_ms)
        }
    }

    fn drop_sample(&mut self, elapsed_ms: u32) -> TickOutcome {
        self.stats.dropped += 1;
        log::trace!("store full, dropped sample at {elapsed_ms} ms");
        TickOutcome::Dropped { elapsed_ms }
    }

    fn finalize(&mut self) {
        self.session.state = RecorderState::Idle;
        self.finalized = true;
        #[cfg(feature = "std")]
        {
            use std::string::ToString;
            self.csv_cache = Some(self.render_csv().to_string());
        }
    }

    fn render_csv(&self) -> CsvExport<'_> {
        let records = if self.finalized {
            self.store.records()
        } else {
            &[]
        };
        CsvExport::new(self.config.csv_layout(), records)
    }

    /// Returns the CSV export.
    ///
    /// Until a session was finalized, and while a session is running, this is
    /// only the header line. Afterwards, it contains all records of the last
    /// session. The text is rendered once on finalization (with `std`) and
    /// stays the same until the next session starts.
    pub fn export_csv(&self) -> CsvExport<'_> {
        #[cfg(feature = "std")]
        {
            if let Some(csv) = self.csv_cache.as_deref() {
                return CsvExport::rendered(csv);
            }
        }
        self.render_csv()
    }

    /// Returns the latest sample for polling clients.
    pub fn export_latest(&self) -> LatestExport {
        LatestExport::from_state(self.session.state, self.store.latest())
    }

    /// Returns `true` if a session is running.
    #[must_use]
    pub fn is_recording(&self) -> bool {
        self.session.state == RecorderState::Recording
    }

    /// Returns the state.
    #[must_use]
    pub fn state(&self) -> RecorderState {
        self.session.state
    }

    /// Returns the current (or last) session.
    #[must_use]
    pub const fn session(&self) -> &RecordingSession {
        &self.session
    }

    /// Returns the statistics of the current (or last) session.
    #[must_use]
    pub const fn stats(&self) -> SessionStats {
        self.stats
    }

    /// Access the underlying store.
    #[must_use]
    pub const fn store(&self) -> &S {
        &self.store
    }

    /// Returns the configuration.
    #[must_use]
    pub const fn config(&self) -> &RecorderConfig {
        &self.config
    }

    /// Returns the smoothing filter.
    #[must_use]
    pub const fn filter(&self) -> &MovingAverage<W> {
        &self.filter
    }
}
