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

//! Compile-time constants of the firmware and the validated runtime
//! configuration of a [`Recorder`].
//!
//! The constants describe the reference hardware: a 12-bit ADC on channel 34,
//! sampled every millisecond, with three-second recording sessions.
//!
//! [`Recorder`]: crate::Recorder

use thiserror::Error;

/// The analog channel (GPIO) the signal is connected to.
pub const ANALOG_CHANNEL: u8 = 34;

/// Interval between two samples. 1000 µs == 1 kHz.
pub const SAMPLE_INTERVAL_US: u32 = 1000;

/// Duration of a bounded recording session.
pub const RECORD_DURATION_MS: u32 = 3000;

/// Number of most recent readings the moving average considers.
pub const FILTER_WINDOW: usize = 10;

/// Capacity of the session buffer. Sized to exactly fit one bounded session
/// at the configured sample rate.
pub const BUFFER_CAPACITY: usize =
    (RECORD_DURATION_MS as usize * 1000) / SAMPLE_INTERVAL_US as usize;

/// Possible errors when building a [`RecorderConfig`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// A zero interval would fire the sample clock on every poll.
    #[error("the sample interval must not be zero")]
    ZeroInterval,
    /// A bounded session must last for some time.
    #[error("the duration of a bounded session must not be zero")]
    ZeroDuration,
}

/// How a recording session terminates.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SessionMode {
    /// The session ends on its own once `duration_ms` have passed.
    Bounded {
        /// Session length in milliseconds.
        duration_ms: u32,
    },
    /// The session runs until it is stopped explicitly.
    Continuous,
}

/// The column layout of the CSV export.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum CsvLayout {
    /// `Tempo (ms),Bruto,Filtrado`
    #[default]
    RawAndFiltered,
    /// `Tempo (ms),Valor`
    RawOnly,
}

impl CsvLayout {
    /// Returns the header line, including the trailing newline.
    #[must_use]
    pub const fn header(self) -> &'static str {
        match self {
            Self::RawAndFiltered => "Tempo (ms),Bruto,Filtrado\n",
            Self::RawOnly => "Tempo (ms),Valor\n",
        }
    }
}

/// Validated, immutable configuration of a [`Recorder`].
///
/// [`Recorder`]: crate::Recorder
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct RecorderConfig {
    channel: u8,
    sample_interval_us: u32,
    mode: SessionMode,
    csv_layout: CsvLayout,
}

impl RecorderConfig {
    /// Creates a new validated configuration.
    pub fn new(
        channel: u8,
        sample_interval_us: u32,
        mode: SessionMode,
        csv_layout: CsvLayout,
    ) -> Result<Self, ConfigError> {
        if sample_interval_us == 0 {
            return Err(ConfigError::ZeroInterval);
        }
        if mode == (SessionMode::Bounded { duration_ms: 0 }) {
            return Err(ConfigError::ZeroDuration);
        }

        Ok(Self {
            channel,
            sample_interval_us,
            mode,
            csv_layout,
        })
    }

    /// Three-second sessions exported as CSV with raw and filtered columns.
    #[must_use]
    pub const fn bounded_csv() -> Self {
        Self {
            channel: ANALOG_CHANNEL,
            sample_interval_us: SAMPLE_INTERVAL_US,
            mode: SessionMode::Bounded {
                duration_ms: RECORD_DURATION_MS,
            },
            csv_layout: CsvLayout::RawAndFiltered,
        }
    }

    /// Like [`Self::bounded_csv`] but only exports the raw column.
    #[must_use]
    pub const fn minimal() -> Self {
        Self {
            csv_layout: CsvLayout::RawOnly,
            ..Self::bounded_csv()
        }
    }

    /// Continuous sessions that are polled for the latest sample.
    #[must_use]
    pub const fn live() -> Self {
        Self {
            mode: SessionMode::Continuous,
            ..Self::bounded_csv()
        }
    }

    /// Returns the analog channel.
    #[must_use]
    pub const fn channel(&self) -> u8 {
        self.channel
    }

    /// Returns the sample interval (µs).
    #[must_use]
    pub const fn sample_interval_us(&self) -> u32 {
        self.sample_interval_us
    }

    /// Returns the session mode.
    #[must_use]
    pub const fn mode(&self) -> SessionMode {
        self.mode
    }

    /// Returns the CSV layout.
    #[must_use]
    pub const fn csv_layout(&self) -> CsvLayout {
        self.csv_layout
    }

    /// Returns the number of samples a bounded session produces when no tick
    /// is missed, or `None` for continuous sessions.
    #[must_use]
    pub fn expected_samples(&self) -> Option<usize> {
        match self.mode {
            SessionMode::Bounded { duration_ms } => {
                let samples = duration_ms as u64 * 1000 / self.sample_interval_us as u64;
                Some(samples as usize)
            }
            SessionMode::Continuous => None,
        }
    }
}

impl Default for RecorderConfig {
    fn default() -> Self {
        Self::bounded_csv()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert2::check;

    #[test]
    fn buffer_capacity_matches_one_session() {
        check!(BUFFER_CAPACITY == 3000);
        check!(RecorderConfig::bounded_csv().expected_samples() == Some(BUFFER_CAPACITY));
        check!(RecorderConfig::live().expected_samples() == None);
    }

    #[test]
    fn presets() {
        let minimal = RecorderConfig::minimal();
        check!(minimal.csv_layout() == CsvLayout::RawOnly);
        check!(minimal.mode() == RecorderConfig::bounded_csv().mode());

        let live = RecorderConfig::live();
        check!(live.mode() == SessionMode::Continuous);
        check!(live.channel() == ANALOG_CHANNEL);
        check!(live.sample_interval_us() == SAMPLE_INTERVAL_US);
    }

    #[test]
    fn invalid_config_is_rejected() {
        check!(
            RecorderConfig::new(0, 0, SessionMode::Continuous, CsvLayout::default())
                == Err(ConfigError::ZeroInterval)
        );
        check!(
            RecorderConfig::new(
                0,
                500,
                SessionMode::Bounded { duration_ms: 0 },
                CsvLayout::default()
            ) == Err(ConfigError::ZeroDuration)
        );
        let config = RecorderConfig::new(
            2,
            500,
            SessionMode::Bounded { duration_ms: 100 },
            CsvLayout::RawOnly,
        )
        .unwrap();
        check!(config.expected_samples() == Some(200));
    }

    #[test]
    fn csv_headers() {
        check!(CsvLayout::RawAndFiltered.header() == "Tempo (ms),Bruto,Filtrado\n");
        check!(CsvLayout::RawOnly.header() == "Tempo (ms),Valor\n");
    }
}
