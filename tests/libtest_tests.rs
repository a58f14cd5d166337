// Tests for the libtest JSON adapter

use std::io::Cursor;

use testsheet::collector::Collector;
use testsheet::config::{MailConfig, ReportConfig};
use testsheet::error::MailError;
use testsheet::host::LibtestFeed;
use testsheet::mail::{Mailer, OutgoingMail, SmtpSettings};
use testsheet::plugin::{ExcelPlugin, RunListener};
use testsheet::report::ExcelReporter;
use testsheet::state::TestStatus;

const CARGO_OUTPUT: &str = r#"   Compiling demo v0.1.0 (/work/demo)
{ "type": "suite", "event": "started", "test_count": 4 }
{ "type": "test", "event": "started", "name": "tests::adds" }
{ "type": "test", "event": "started", "name": "tests::divides" }
{ "type": "test", "event": "started", "name": "tests::slow" }
{ "type": "test", "name": "tests::adds", "event": "ok" }
{ "type": "test", "name": "tests::slow", "event": "ignored", "message": "needs network" }
{ "type": "test", "event": "started", "name": "tests::subtracts" }
{ "type": "test", "name": "tests::subtracts", "event": "failed", "stdout": "thread 'tests::subtracts' panicked at src/lib.rs:9:9:\nassertion `left == right` failed\n  left: 1\n right: 2\n" }
{ "type": "test", "name": "tests::divides", "event": "failed" }
{ "type": "suite", "event": "failed", "passed": 1, "failed": 2, "ignored": 1, "measured": 0, "filtered_out": 0, "exec_time": 0.01 }
{ "type": "suite", "event": "started", "test_count": 1 }
{ "type": "test", "event": "started", "name": "it_boots" }
{ "type": "test", "name": "it_boots", "event": "ok" }
{ "type": "suite", "event": "ok", "passed": 1, "failed": 0, "ignored": 0, "measured": 0, "filtered_out": 0, "exec_time": 0.001 }
"#;

struct NoMail;

impl Mailer for NoMail {
    fn send(&self, _mail: &OutgoingMail) -> Result<(), MailError> {
        panic!("mail must not be sent without recipients");
    }
}

fn plugin(dir: &std::path::Path) -> ExcelPlugin<testsheet::time::SystemClock, NoMail> {
    let config = ReportConfig {
        output_file: dir.join("cargo.xlsx"),
        suite_name: "demo".to_string(),
        mail: MailConfig {
            smtp: SmtpSettings {
                host: "localhost".to_string(),
                port: 25,
                user: None,
                password: None,
                starttls: false,
            },
            from: None,
            to: Vec::new(),
            subject: "unused".to_string(),
        },
    };
    ExcelPlugin::new(Collector::new(), ExcelReporter::with_mailer(config, NoMail))
}

#[test]
fn test_cargo_output_is_collected() {
    // Arrange
    let temp_dir = tempfile::TempDir::new().expect("Failed to create temp dir");
    let mut plugin = plugin(temp_dir.path());

    // Act
    let summary = LibtestFeed::new(&mut plugin)
        .consume(Cursor::new(CARGO_OUTPUT))
        .expect("Failed to consume output");

    // Assert
    assert_eq!(summary.verdicts, 5);
    assert_eq!(summary.ignored_lines, 1);

    let state = plugin.state();
    let stats = state.stats();
    assert_eq!(stats.passes(), 2);
    assert_eq!(stats.failures(), 2);
    assert_eq!(stats.skipped(), 1);
    assert_eq!(stats.errors(), 0);
    assert!(state.window.start.is_some());

    let records = state.records();
    let statuses: Vec<(&str, TestStatus)> = records
        .iter()
        .map(|r| (r.test.as_str(), r.status))
        .collect();
    assert_eq!(
        statuses,
        vec![
            ("tests::adds", TestStatus::Ok),
            ("tests::slow", TestStatus::Skipped),
            ("tests::subtracts", TestStatus::Failure),
            ("tests::divides", TestStatus::Failure),
            ("it_boots", TestStatus::Ok),
        ]
    );
    assert_eq!(records[1].message, "needs network");
    assert!(records[2].message.contains("left: 1"));
    assert_eq!(records[3].message, "TestFailed");
}

#[test]
fn test_report_written_after_feed() {
    // Arrange
    let temp_dir = tempfile::TempDir::new().expect("Failed to create temp dir");
    let mut plugin = plugin(temp_dir.path());
    LibtestFeed::new(&mut plugin)
        .consume(Cursor::new(CARGO_OUTPUT))
        .expect("Failed to consume output");

    // Act
    let mut console: Vec<u8> = Vec::new();
    plugin.on_run_end(&mut console).expect("report failed");

    // Assert
    assert!(temp_dir.path().join("cargo.xlsx").exists());
    let output = String::from_utf8(console).expect("utf-8 console output");
    assert!(output.contains("total 5"));
}

#[test]
fn test_malformed_lines_are_skipped() {
    // Arrange
    let temp_dir = tempfile::TempDir::new().expect("Failed to create temp dir");
    let mut plugin = plugin(temp_dir.path());
    let input = "{ not json\n{\"type\":\"test\",\"name\":\"a\",\"event\":\"ok\"}\n\n";

    // Act
    let summary = LibtestFeed::new(&mut plugin)
        .consume(Cursor::new(input))
        .expect("Failed to consume output");

    // Assert
    assert_eq!(summary.lines, 3);
    assert_eq!(summary.ignored_lines, 2);
    assert_eq!(plugin.state().stats().passes(), 1);
    assert!(plugin.state().window.start.is_some());
}

#[test]
fn test_empty_stream_still_starts_run() {
    // Arrange
    let temp_dir = tempfile::TempDir::new().expect("Failed to create temp dir");
    let mut plugin = plugin(temp_dir.path());

    // Act
    let summary = LibtestFeed::new(&mut plugin)
        .consume(Cursor::new(""))
        .expect("Failed to consume output");

    // Assert
    assert_eq!(summary.verdicts, 0);
    assert!(plugin.state().window.start.is_some());
    assert_eq!(plugin.state().stats().total(), 0);
}

#[test]
fn test_timeout_warning_is_not_a_verdict() {
    // Arrange
    let temp_dir = tempfile::TempDir::new().expect("Failed to create temp dir");
    let mut plugin = plugin(temp_dir.path());
    let input = concat!(
        "{\"type\":\"test\",\"event\":\"started\",\"name\":\"slow\"}\n",
        "{\"type\":\"test\",\"event\":\"timeout\",\"name\":\"slow\"}\n",
        "{\"type\":\"test\",\"event\":\"ok\",\"name\":\"slow\"}\n",
    );

    // Act
    let summary = LibtestFeed::new(&mut plugin)
        .consume(Cursor::new(input))
        .expect("Failed to consume output");

    // Assert
    assert_eq!(summary.verdicts, 1);
    assert_eq!(plugin.state().stats().passes(), 1);
}

#[test]
fn test_exec_time_is_used_for_interleaved_tests() {
    // Arrange
    let temp_dir = tempfile::TempDir::new().expect("Failed to create temp dir");
    let mut plugin = plugin(temp_dir.path());
    let input = concat!(
        "{\"type\":\"test\",\"event\":\"started\",\"name\":\"a\"}\n",
        "{\"type\":\"test\",\"event\":\"started\",\"name\":\"b\"}\n",
        "{\"type\":\"test\",\"event\":\"ok\",\"name\":\"a\",\"exec_time\":2.5}\n",
        "{\"type\":\"test\",\"event\":\"failed\",\"name\":\"b\",\"exec_time\":1.25}\n",
    );

    // Act
    LibtestFeed::new(&mut plugin)
        .consume(Cursor::new(input))
        .expect("Failed to consume output");

    // Assert
    let elapsed: Vec<f64> = plugin.state().records().iter().map(|r| r.elapsed).collect();
    assert_eq!(elapsed, vec![2.5, 1.25]);
}

#[test]
fn test_empty_message_falls_back_to_stdout() {
    // Arrange
    let temp_dir = tempfile::TempDir::new().expect("Failed to create temp dir");
    let mut plugin = plugin(temp_dir.path());
    let input = concat!(
        "{\"type\":\"test\",\"event\":\"failed\",\"name\":\"a\",\"message\":\"\",",
        "\"stdout\":\"thread 'a' panicked\\n\"}\n",
    );

    // Act
    LibtestFeed::new(&mut plugin)
        .consume(Cursor::new(input))
        .expect("Failed to consume output");

    // Assert
    assert_eq!(plugin.state().records()[0].message, "thread 'a' panicked\n");
}
