// Report module - renders the run into a spreadsheet and delivers it

pub mod document;
pub mod xlsx;

pub use document::{CellValue, DetailRow, ReportDocument, SummaryRow};

use crate::config::ReportConfig;
use crate::error::{MailError, ReportError};
use crate::mail::{self, Mailer, OutgoingMail, SmtpMailer};
use crate::state::RunState;
use std::path::{Path, PathBuf};
use tracing::info;

/// What the report step produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportOutcome {
    pub path: PathBuf,
    /// Number of recipients the report was mailed to; zero when mail is off
    pub mailed_to: usize,
}

/// Excel reporter - writes the results workbook and optionally mails it
pub struct ExcelReporter<M: Mailer = SmtpMailer> {
    config: ReportConfig,
    mailer: M,
}

impl ExcelReporter<SmtpMailer> {
    /// Create a reporter that mails through the configured SMTP server
    pub fn new(config: ReportConfig) -> Self {
        let mailer = SmtpMailer::new(config.mail.smtp.clone());
        Self::with_mailer(config, mailer)
    }
}

impl<M: Mailer> ExcelReporter<M> {
    pub fn with_mailer(config: ReportConfig, mailer: M) -> Self {
        Self { config, mailer }
    }

    /// Lay out the document for the given state
    pub fn render(&self, state: &RunState) -> ReportDocument {
        ReportDocument::build(&self.config.suite_name, state)
    }

    /// Write the workbook, overwriting any previous file, then mail it when
    /// recipients are configured.
    ///
    /// A mail failure is returned as-is; the workbook stays on disk.
    pub fn report(&self, state: &RunState) -> Result<ReportOutcome, ReportError> {
        let path = &self.config.output_file;
        let bytes = xlsx::render(&self.render(state))?;
        std::fs::write(path, bytes).map_err(|source| ReportError::Persist {
            path: path.clone(),
            source,
        })?;
        info!("Excel report written to {}", path.display());

        let recipients = &self.config.mail.to;
        if recipients.is_empty() {
            return Ok(ReportOutcome {
                path: path.clone(),
                mailed_to: 0,
            });
        }

        let outgoing = self.compose(state, path)?;
        self.mailer.send(&outgoing)?;

        Ok(ReportOutcome {
            path: path.clone(),
            mailed_to: recipients.len(),
        })
    }

    fn compose(&self, state: &RunState, path: &Path) -> Result<OutgoingMail, MailError> {
        let mail_config = &self.config.mail;
        let from = mail_config.from.clone().ok_or(MailError::MissingSender)?;
        let report_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        Ok(OutgoingMail {
            from,
            to: mail_config.to.clone(),
            subject: mail_config.subject.clone(),
            body: mail::compose_body(state.stats(), &report_name),
            attachments: vec![path.to_path_buf()],
        })
    }
}
