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

//! The cooperative outer loop that interleaves request handling and
//! sampling on a single thread.
//!
//! Each iteration services at most one pending request and then checks the
//! sample clock once. Both poll sources are non-blocking, so no async runtime
//! is needed. If serving a request takes longer than a sample interval,
//! samples are skipped, never queued.

use crate::acquisition::SampleStore;
use crate::routes::{self, AssetStore, Response};
use crate::sample::{AnalogInput, MonotonicClock};
use crate::session::{Recorder, TickOutcome};

/// A request waiting for its response.
pub trait PendingRequest {
    /// The request path, including an optional query string.
    fn path(&self) -> &str;

    /// Sends the response. Must not block on the remote side.
    fn respond(self, response: Response<'_>);
}

/// Non-blocking source of requests, such as a network listener.
pub trait RequestSource {
    /// The type of request this source produces.
    type Request: PendingRequest;

    /// Returns the next pending request, if any, without blocking.
    fn poll_request(&mut self) -> Option<Self::Request>;
}

/// What one [`EventLoop::run_once`] did.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Iteration {
    /// Whether a request was served.
    pub served_request: bool,
    /// Outcome of the sampling step.
    pub tick: TickOutcome,
}

/// Owns the whole acquisition context and drives it.
///
/// There are no globals: recorder, input, clock, assets, and the request
/// source are all owned here and passed by reference into the handlers.
#[derive(Debug)]
pub struct EventLoop<S, I, C, A, R, const W: usize>
where
    S: SampleStore,
    I: AnalogInput,
    C: MonotonicClock,
    A: AssetStore,
    R: RequestSource,
{
    recorder: Recorder<S, W>,
    input: I,
    clock: C,
    assets: A,
    requests: R,
}

impl<S, I, C, A, R, const W: usize> EventLoop<S, I, C, A, R, W>
where
    S: SampleStore,
    I: AnalogInput,
    C: MonotonicClock,
    A: AssetStore,
    R: RequestSource,
{
    /// Creates a new loop.
    pub fn new(recorder: Recorder<S, W>, input: I, clock: C, assets: A, requests: R) -> Self {
        Self {
            recorder,
            input,
            clock,
            assets,
            requests,
        }
    }

    /// Runs a single iteration: at most one request, then one clock check.
    pub fn run_once(&mut self) -> Iteration {
        let served_request = match self.requests.poll_request() {
            Some(request) => {
                let now = self.clock.now();
                let response = routes::handle(&mut self.recorder, &self.assets, request.path(), now);
                log::trace!("{} {}", response.status, request.path());
                request.respond(response);
                true
            }
            None => false,
        };

        let tick = self.recorder.tick(self.clock.now(), &mut self.input);

        Iteration {
            served_request,
            tick,
        }
    }

    /// Runs iterations until `should_stop` returns `true`. The condition is
    /// checked before every iteration.
    pub fn run_until(&mut self, mut should_stop: impl FnMut(&Recorder<S, W>) -> bool) {
        while !should_stop(&self.recorder) {
            self.run_once();
        }
    }

    /// Returns the recorder.
    #[must_use]
    pub const fn recorder(&self) -> &Recorder<S, W> {
        &self.recorder
    }

    /// Returns the clock.
    #[must_use]
    pub const fn clock(&self) -> &C {
        &self.clock
    }

    /// Returns the request source.
    #[must_use]
    pub const fn requests(&self) -> &R {
        &self.requests
    }

    /// Returns the request source.
    pub fn requests_mut(&mut self) -> &mut R {
        &mut self.requests
    }

    /// Returns the analog input.
    #[must_use]
    pub const fn input(&self) -> &I {
        &self.input
    }

    /// Consumes the loop and returns its parts.
    pub fn into_parts(self) -> (Recorder<S, W>, I, C, A, R) {
        (
            self.recorder,
            self.input,
            self.clock,
            self.assets,
            self.requests,
        )
    }
}

#[cfg(all(test, feature = "std"))]
mod tests {
    use super::*;
    use crate::acquisition::{LatestSlot, SessionBuffer};
    use crate::config::{RecorderConfig, BUFFER_CAPACITY, FILTER_WINDOW};
    use crate::routes::NoAssets;
    use crate::stdlib::RequestQueue;
    use crate::test_utils::{ManualClock, ScriptedInput};
    use assert2::check;

    type BulkLoop = EventLoop<
        SessionBuffer<BUFFER_CAPACITY>,
        ScriptedInput,
        ManualClock,
        NoAssets,
        RequestQueue,
        FILTER_WINDOW,
    >;

    fn bulk_loop(clock: ManualClock) -> BulkLoop {
        EventLoop::new(
            Recorder::new(RecorderConfig::bounded_csv(), SessionBuffer::new()),
            ScriptedInput::constant(1000),
            clock,
            NoAssets,
            RequestQueue::new(),
        )
    }

    #[test]
    fn one_request_per_iteration() {
        let clock = ManualClock::new();
        let mut event_loop = bulk_loop(clock.clone());
        event_loop.requests_mut().push("/live_data");
        event_loop.requests_mut().push("/favicon.ico");

        check!(event_loop.run_once().served_request);
        check!(event_loop.requests().pending() == 1);
        check!(event_loop.run_once().served_request);
        check!(!event_loop.run_once().served_request);

        let responses = event_loop.requests().responses();
        check!(responses.len() == 2);
        check!(responses[0].status == 200);
        check!(responses[1].status == 204);
    }

    #[test]
    fn full_bounded_session_through_the_loop() {
        let clock = ManualClock::new();
        let mut event_loop = bulk_loop(clock.clone());
        event_loop.requests_mut().push("/start");

        // 1 ms per iteration, for 3.5 seconds
        for _ in 0..3500 {
            event_loop.run_once();
            clock.advance_micros(1000);
        }
        check!(!event_loop.recorder().is_recording());
        check!(event_loop.recorder().store().len() == 3000);

        event_loop.requests_mut().push("/data");
        event_loop.run_once();
        let responses = event_loop.requests().responses();
        let csv = std::str::from_utf8(&responses[1].body).unwrap();
        check!(csv.lines().count() == 3001);
        check!(csv.starts_with("Tempo (ms),Bruto,Filtrado\n1,1000,1000\n"));
        check!(csv.ends_with("3000,1000,1000\n"));
    }

    #[test]
    fn sampling_continues_between_polls() {
        let clock = ManualClock::new();
        let mut event_loop = EventLoop::<_, _, _, _, _, FILTER_WINDOW>::new(
            Recorder::new(RecorderConfig::live(), LatestSlot::new()),
            ScriptedInput::new([10, 20, 30, 40]),
            clock.clone(),
            NoAssets,
            RequestQueue::new(),
        );
        event_loop.requests_mut().push("/start");
        event_loop.run_once();

        for _ in 0..4 {
            clock.advance_micros(1000);
            event_loop.requests_mut().push("/live_data");
            let iteration = event_loop.run_once();
            check!(matches!(iteration.tick, TickOutcome::Sampled(_)));
        }

        let bodies = event_loop
            .requests()
            .responses()
            .iter()
            .map(|r| std::string::String::from_utf8(r.body.clone()).unwrap())
            .collect::<std::vec::Vec<_>>();
        // the request is served before the sample of the same iteration
        check!(bodies[1] == r#"{"status":"waiting"}"#);
        check!(bodies[2] == r#"{"time_ms":1,"raw":10,"filtered":10}"#);
        check!(bodies[4] == r#"{"time_ms":3,"raw":30,"filtered":20}"#);
    }

    #[test]
    fn run_until_stops_on_condition() {
        let clock = ManualClock::new();
        let mut event_loop = bulk_loop(clock.clone());
        event_loop.requests_mut().push("/start");

        let mut iterations = 0;
        event_loop.run_until(|recorder| {
            iterations += 1;
            clock.advance_micros(1000);
            iterations > 1 && !recorder.is_recording()
        });
        check!(event_loop.recorder().stats().samples == 3000);
    }
}
