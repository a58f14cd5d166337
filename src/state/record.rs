// Per-test record structures

use chrono::NaiveDateTime;
use std::fmt;

/// Verdict recorded for one test
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TestStatus {
    Ok,
    Failure,
    Error,
    Skipped,
}

impl TestStatus {
    /// Label shown in the status column
    pub fn as_str(&self) -> &'static str {
        match self {
            TestStatus::Ok => "ok",
            TestStatus::Failure => "failure",
            TestStatus::Error => "error",
            TestStatus::Skipped => "skipped",
        }
    }
}

impl fmt::Display for TestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One completed test, in completion order
#[derive(Debug, Clone, PartialEq)]
pub struct TestRecord {
    pub timestamp: NaiveDateTime,
    pub test: String,
    /// Seconds between the before-test marker and the verdict
    pub elapsed: f64,
    pub status: TestStatus,
    pub message: String,
}

impl TestRecord {
    /// Create a passing record; its message is always empty
    pub fn ok(timestamp: NaiveDateTime, test: impl Into<String>, elapsed: f64) -> Self {
        Self::new(timestamp, test, elapsed, TestStatus::Ok, String::new())
    }

    pub fn new(
        timestamp: NaiveDateTime,
        test: impl Into<String>,
        elapsed: f64,
        status: TestStatus,
        message: impl Into<String>,
    ) -> Self {
        Self {
            timestamp,
            test: test.into(),
            elapsed: elapsed.max(0.0),
            status,
            message: message.into(),
        }
    }
}
