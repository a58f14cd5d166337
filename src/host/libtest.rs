// libtest JSON adapter
//
// Drives a RunListener from the event stream printed by
// `cargo test -- -Z unstable-options --format json`.

use crate::collector::{ErrorKind, FailureInfo};
use crate::plugin::RunListener;
use anyhow::{Context, Result};
use serde::Deserialize;
use std::io::BufRead;
use tracing::{debug, warn};

/// One line of libtest output; fields absent for an event kind stay `None`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LibtestEvent {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub event: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub stdout: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    /// Seconds the test ran, present with `--report-time`
    #[serde(default)]
    pub exec_time: Option<f64>,
}

/// Line counts from one pass over the stream
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FeedSummary {
    pub lines: usize,
    pub verdicts: usize,
    /// Lines that were not libtest JSON (compiler noise, plain output)
    pub ignored_lines: usize,
}

/// Feeds libtest events into a listener, starting the run exactly once
pub struct LibtestFeed<'a, L: RunListener + ?Sized> {
    listener: &'a mut L,
    started: bool,
    summary: FeedSummary,
}

impl<'a, L: RunListener + ?Sized> LibtestFeed<'a, L> {
    pub fn new(listener: &'a mut L) -> Self {
        Self {
            listener,
            started: false,
            summary: FeedSummary::default(),
        }
    }

    /// Read every line of `reader` and dispatch the events it contains
    pub fn consume<R: BufRead>(mut self, reader: R) -> Result<FeedSummary> {
        for line in reader.lines() {
            let line = line.context("Failed to read libtest output")?;
            self.feed_line(&line);
        }
        // An empty stream still produces a report with a start time
        self.ensure_started();
        Ok(self.summary)
    }

    pub fn feed_line(&mut self, line: &str) {
        self.summary.lines += 1;
        let trimmed = line.trim();
        if !trimmed.starts_with('{') {
            self.summary.ignored_lines += 1;
            return;
        }
        match serde_json::from_str::<LibtestEvent>(trimmed) {
            Ok(event) => self.dispatch(&event),
            Err(e) => {
                warn!("Skipping malformed libtest event: {}", e);
                self.summary.ignored_lines += 1;
            }
        }
    }

    fn ensure_started(&mut self) {
        if !self.started {
            self.started = true;
            self.listener.on_run_start();
        }
    }

    // Verdict events carry the runner's own timing when available
    fn report_duration(&mut self, name: &str, event: &LibtestEvent) {
        if let Some(seconds) = event.exec_time {
            self.listener.on_test_duration(name, seconds);
        }
    }

    pub fn dispatch(&mut self, event: &LibtestEvent) {
        let name = event.name.as_deref().unwrap_or_default();
        match (event.kind.as_str(), event.event.as_deref()) {
            ("suite", Some("started")) => self.ensure_started(),
            ("test", Some("started")) => {
                self.ensure_started();
                self.listener.on_before_test(name);
            }
            ("test", Some("ok")) => {
                self.ensure_started();
                self.report_duration(name, event);
                self.listener.on_test_passed(name);
                self.summary.verdicts += 1;
            }
            ("test", Some("failed")) => {
                self.ensure_started();
                self.report_duration(name, event);
                let message = event
                    .message
                    .clone()
                    .filter(|m| !m.trim().is_empty())
                    .or_else(|| event.stdout.clone());
                let failure = FailureInfo {
                    kind: ErrorKind::other("TestFailed"),
                    message,
                };
                self.listener.on_test_failed(name, &failure);
                self.summary.verdicts += 1;
            }
            ("test", Some("ignored")) => {
                self.ensure_started();
                self.report_duration(name, event);
                let skip = FailureInfo {
                    kind: ErrorKind::Skip,
                    message: event.message.clone(),
                };
                self.listener.on_test_error(name, &skip);
                self.summary.verdicts += 1;
            }
            ("test", Some("timeout")) => {
                warn!("{} has been running for over 60 seconds", name);
            }
            (kind, ev) => debug!("Ignoring libtest event {} {:?}", kind, ev),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_deserializes_optional_fields() {
        let event: LibtestEvent = serde_json::from_str(
            r#"{ "type": "test", "name": "a::b", "event": "failed", "stdout": "boom\n" }"#,
        )
        .expect("valid event");

        assert_eq!(event.kind, "test");
        assert_eq!(event.event.as_deref(), Some("failed"));
        assert_eq!(event.name.as_deref(), Some("a::b"));
        assert_eq!(event.stdout.as_deref(), Some("boom\n"));
        assert!(event.message.is_none());
        assert!(event.exec_time.is_none());
    }

    #[test]
    fn test_event_reads_exec_time() {
        let event: LibtestEvent = serde_json::from_str(
            r#"{ "type": "test", "name": "a", "event": "ok", "exec_time": 2.5 }"#,
        )
        .expect("valid event");
        assert_eq!(event.exec_time, Some(2.5));
    }

    #[test]
    fn test_bench_event_has_no_event_field() {
        let event: LibtestEvent =
            serde_json::from_str(r#"{ "type": "bench", "name": "b", "median": 10, "deviation": 1 }"#)
                .expect("valid event");
        assert_eq!(event.kind, "bench");
        assert!(event.event.is_none());
    }
}
