// Host-facing entry points: the listener contract and the Excel plugin

use crate::collector::{Collector, FailureInfo};
use crate::mail::{Mailer, SmtpMailer};
use crate::report::{ExcelReporter, ReportOutcome};
use crate::state::RunState;
use crate::time::{Clock, SystemClock};
use anyhow::Result;
use std::io::Write;

/// Lifecycle notifications a host test runner delivers, in order:
/// run start, then before-test/verdict pairs, then run end.
pub trait RunListener {
    /// Called once before any test runs
    fn on_run_start(&mut self);

    /// Called right before a test executes
    fn on_before_test(&mut self, test_id: &str);

    /// Runner-measured duration of the test whose verdict comes next
    fn on_test_duration(&mut self, _test_id: &str, _seconds: f64) {}

    fn on_test_passed(&mut self, test_id: &str);

    fn on_test_failed(&mut self, test_id: &str, failure: &FailureInfo);

    /// Errors include skips, told apart by the error kind
    fn on_test_error(&mut self, test_id: &str, error: &FailureInfo);

    /// Called once after the last verdict; `sink` is the runner's console
    fn on_run_end(&mut self, sink: &mut dyn Write) -> Result<()>;
}

/// Collector and reporter wired together behind [`RunListener`]
pub struct ExcelPlugin<C: Clock = SystemClock, M: Mailer = SmtpMailer> {
    collector: Collector<C>,
    reporter: ExcelReporter<M>,
    outcome: Option<ReportOutcome>,
}

impl<C: Clock, M: Mailer> ExcelPlugin<C, M> {
    pub fn new(collector: Collector<C>, reporter: ExcelReporter<M>) -> Self {
        Self {
            collector,
            reporter,
            outcome: None,
        }
    }

    pub fn state(&self) -> &RunState {
        self.collector.state()
    }

    /// Result of the last successful report step
    pub fn outcome(&self) -> Option<&ReportOutcome> {
        self.outcome.as_ref()
    }
}

impl<C: Clock, M: Mailer> RunListener for ExcelPlugin<C, M> {
    fn on_run_start(&mut self) {
        self.collector.on_run_start();
    }

    fn on_before_test(&mut self, test_id: &str) {
        self.collector.on_before_test(test_id);
    }

    fn on_test_duration(&mut self, test_id: &str, seconds: f64) {
        self.collector.on_test_duration(test_id, seconds);
    }

    fn on_test_passed(&mut self, test_id: &str) {
        self.collector.on_test_passed(test_id);
    }

    fn on_test_failed(&mut self, test_id: &str, failure: &FailureInfo) {
        self.collector.on_test_failed(test_id, failure);
    }

    fn on_test_error(&mut self, test_id: &str, error: &FailureInfo) {
        self.collector.on_test_error(test_id, error);
    }

    fn on_run_end(&mut self, sink: &mut dyn Write) -> Result<()> {
        let state = self.collector.finish();
        let outcome = self.reporter.report(state)?;

        let stats = state.stats();
        writeln!(
            sink,
            "Excel report: {} (total {}, errors {}, failures {}, passes {}, skipped {})",
            outcome.path.display(),
            stats.total(),
            stats.errors(),
            stats.failures(),
            stats.passes(),
            stats.skipped()
        )?;
        if outcome.mailed_to > 0 {
            writeln!(sink, "Mail sent to {} recipient(s)", outcome.mailed_to)?;
        }

        self.outcome = Some(outcome);
        Ok(())
    }
}
