// State module - accumulated run state
// Counters, the ordered record log and the run window

pub mod record;
pub mod window;

pub use record::{TestRecord, TestStatus};
pub use window::RunWindow;

/// Verdict counters; they only ever grow
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunStatistics {
    errors: usize,
    failures: usize,
    passes: usize,
    skipped: usize,
}

impl RunStatistics {
    /// Count one verdict
    pub fn count(&mut self, status: TestStatus) {
        match status {
            TestStatus::Ok => self.passes += 1,
            TestStatus::Failure => self.failures += 1,
            TestStatus::Error => self.errors += 1,
            TestStatus::Skipped => self.skipped += 1,
        }
    }

    pub fn errors(&self) -> usize {
        self.errors
    }

    pub fn failures(&self) -> usize {
        self.failures
    }

    pub fn passes(&self) -> usize {
        self.passes
    }

    pub fn skipped(&self) -> usize {
        self.skipped
    }

    pub fn total(&self) -> usize {
        self.errors + self.failures + self.passes + self.skipped
    }

    /// True when nothing failed or errored
    pub fn is_clean(&self) -> bool {
        self.errors == 0 && self.failures == 0
    }
}

/// Everything the collector has gathered so far
#[derive(Debug, Clone, Default)]
pub struct RunState {
    stats: RunStatistics,
    records: Vec<TestRecord>,
    pub window: RunWindow,
}

impl RunState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a record and count its verdict
    pub fn push(&mut self, record: TestRecord) {
        self.stats.count(record.status);
        self.records.push(record);
    }

    pub fn stats(&self) -> &RunStatistics {
        &self.stats
    }

    /// Records in completion order
    pub fn records(&self) -> &[TestRecord] {
        &self.records
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn record(status: TestStatus) -> TestRecord {
        let ts = NaiveDate::from_ymd_opt(2024, 1, 1)
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .expect("valid datetime");
        TestRecord::new(ts, "t", 0.0, status, "")
    }

    #[test]
    fn test_push_counts_each_status() {
        let mut state = RunState::new();
        state.push(record(TestStatus::Ok));
        state.push(record(TestStatus::Ok));
        state.push(record(TestStatus::Failure));
        state.push(record(TestStatus::Error));
        state.push(record(TestStatus::Skipped));

        let stats = state.stats();
        assert_eq!(stats.passes(), 2);
        assert_eq!(stats.failures(), 1);
        assert_eq!(stats.errors(), 1);
        assert_eq!(stats.skipped(), 1);
        assert_eq!(stats.total(), 5);
        assert_eq!(state.records().len(), 5);
    }

    #[test]
    fn test_is_clean() {
        let mut stats = RunStatistics::default();
        stats.count(TestStatus::Ok);
        stats.count(TestStatus::Skipped);
        assert!(stats.is_clean());

        stats.count(TestStatus::Error);
        assert!(!stats.is_clean());
    }

    #[test]
    fn test_empty_state() {
        let state = RunState::new();
        assert_eq!(state.stats().total(), 0);
        assert!(state.records().is_empty());
        assert!(state.window.start.is_none());
    }
}
