//! Records a bounded session from a simulated, noisy analog input in real
//! time and prints the CSV export. Press Ctrl+C to stop early.
//!
//! Run with `$ cargo run --example simulated-session`

use adc_recorder::stdlib::{MemoryAssets, RequestQueue, SystemClock};
use adc_recorder::*;
use itertools::{Itertools, MinMaxResult};
use log::LevelFilter;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Triangle wave over the full input range with uniform noise on top.
struct SimulatedInput {
    phase: u16,
    noise: u16,
}

impl AnalogInput for SimulatedInput {
    fn read(&mut self, _channel: u8) -> u16 {
        self.phase = (self.phase + 8) % 8190;
        let max = RawSample::MAX.raw();
        let wave = if self.phase > max {
            8190 - self.phase
        } else {
            self.phase
        };
        let noise = rand::random_range(0..=self.noise * 2);
        (wave + noise).saturating_sub(self.noise).min(max)
    }
}

fn init_logger() {
    simple_logger::SimpleLogger::new()
        .with_level(LevelFilter::Debug)
        .with_colors(true)
        .with_utc_timestamps()
        .init()
        .unwrap();
}

fn main() {
    init_logger();

    let stop_recording = Arc::new(AtomicBool::new(false));
    {
        let stop_recording = stop_recording.clone();
        ctrlc::set_handler(move || {
            stop_recording.store(true, Ordering::SeqCst);
        })
        .unwrap();
    }

    let mut assets = MemoryAssets::new();
    assets.insert("/index.html", "<html><body>adc-recorder</body></html>");

    let mut event_loop = EventLoop::<_, _, _, _, _, FILTER_WINDOW>::new(
        Recorder::new(RecorderConfig::bounded_csv(), SessionBuffer::<BUFFER_CAPACITY>::new()),
        SimulatedInput {
            phase: 0,
            noise: 200,
        },
        SystemClock::new(),
        assets,
        RequestQueue::new(),
    );

    event_loop.requests_mut().push("/");
    event_loop.requests_mut().push("/start");
    event_loop.run_once();
    event_loop.run_once();

    log::info!("Start recording");
    event_loop.run_until(|recorder| {
        stop_recording.load(Ordering::SeqCst) || !recorder.is_recording()
    });
    if event_loop.recorder().is_recording() {
        event_loop.requests_mut().push("/stop");
        event_loop.run_once();
    }
    log::info!("Stopped recording");

    let stats = event_loop.recorder().stats();
    log::info!(
        "{} samples over {} ms, {} dropped",
        stats.samples,
        stats.elapsed_ms,
        stats.dropped
    );
    let records = event_loop.recorder().store().records();
    if let MinMaxResult::MinMax(min, max) = records.iter().map(|r| r.filtered).minmax() {
        log::info!("filtered range: {min}..={max}");
    }

    event_loop.requests_mut().push("/data");
    event_loop.run_once();
    let responses = event_loop.requests_mut().take_responses();
    let csv = responses.last().map(|r| r.body.as_slice()).unwrap_or_default();
    print!("{}", String::from_utf8_lossy(csv));
}
