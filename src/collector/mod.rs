// Collector - folds runner notifications into run state

pub mod failure;

pub use failure::{ErrorKind, FailureInfo};

use crate::state::{RunState, TestRecord, TestStatus};
use crate::time::{Clock, SystemClock};
use std::time::Instant;
use tracing::debug;

/// Stateful sink for test lifecycle notifications.
///
/// Notifications arrive strictly one after another: run start, then any
/// number of before-test/verdict pairs. Counters and records only grow.
pub struct Collector<C: Clock = SystemClock> {
    clock: C,
    state: RunState,
    marker: Option<Instant>,
    reported: Option<f64>,
}

impl Default for Collector<SystemClock> {
    fn default() -> Self {
        Self::new()
    }
}

impl Collector<SystemClock> {
    pub fn new() -> Self {
        Self::with_clock(SystemClock)
    }
}

impl<C: Clock> Collector<C> {
    pub fn with_clock(clock: C) -> Self {
        Self {
            clock,
            state: RunState::new(),
            marker: None,
            reported: None,
        }
    }

    /// Record the start of the run
    pub fn on_run_start(&mut self) {
        let now = self.clock.now();
        debug!("Run started at {}", now);
        self.state.window.start = Some(now);
    }

    /// Start timing the upcoming test
    pub fn on_before_test(&mut self, test_id: &str) {
        debug!("Starting {}", test_id);
        self.marker = Some(self.clock.instant());
    }

    /// Duration measured by the runner itself for the upcoming verdict.
    ///
    /// Takes precedence over the before-test marker.
    pub fn on_test_duration(&mut self, test_id: &str, seconds: f64) {
        debug!("{} reported {:.3}s", test_id, seconds);
        self.reported = Some(seconds);
    }

    pub fn on_test_passed(&mut self, test_id: &str) {
        let elapsed = self.take_elapsed();
        let record = TestRecord::ok(self.clock.now(), test_id, elapsed);
        self.push(record);
    }

    pub fn on_test_failed(&mut self, test_id: &str, failure: &FailureInfo) {
        self.push_failure(test_id, TestStatus::Failure, failure);
    }

    /// Record an error, or a skip when the error carries the skip signal
    pub fn on_test_error(&mut self, test_id: &str, error: &FailureInfo) {
        let status = if error.kind.is_skip() {
            TestStatus::Skipped
        } else {
            TestStatus::Error
        };
        self.push_failure(test_id, status, error);
    }

    /// Close the run window and hand out the final state
    pub fn finish(&mut self) -> &RunState {
        self.state.window.end = Some(self.clock.now());
        &self.state
    }

    pub fn state(&self) -> &RunState {
        &self.state
    }

    fn push_failure(&mut self, test_id: &str, status: TestStatus, info: &FailureInfo) {
        let elapsed = self.take_elapsed();
        let record = TestRecord::new(self.clock.now(), test_id, elapsed, status, info.describe());
        self.push(record);
    }

    fn push(&mut self, record: TestRecord) {
        debug!(
            "{} -> {} ({:.3}s)",
            record.test, record.status, record.elapsed
        );
        self.state.push(record);
    }

    // A verdict consumes the marker and any reported duration; without
    // either the elapsed time is zero.
    fn take_elapsed(&mut self) -> f64 {
        let marker = self.marker.take();
        if let Some(seconds) = self.reported.take() {
            return seconds;
        }
        match marker {
            Some(started) => self
                .clock
                .instant()
                .saturating_duration_since(started)
                .as_secs_f64(),
            None => 0.0,
        }
    }
}
