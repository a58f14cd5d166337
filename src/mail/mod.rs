// Mail module - report delivery over SMTP

pub mod smtp;

pub use smtp::{SmtpMailer, SmtpSettings, build_message, send_mail};

use crate::error::MailError;
use crate::state::RunStatistics;
use std::path::PathBuf;

/// A message ready to hand to a [`Mailer`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingMail {
    pub from: String,
    pub to: Vec<String>,
    pub subject: String,
    pub body: String,
    /// Files attached as `application/octet-stream`, named by base name
    pub attachments: Vec<PathBuf>,
}

/// Something that can deliver an [`OutgoingMail`]
pub trait Mailer {
    fn send(&self, mail: &OutgoingMail) -> Result<(), MailError>;
}

impl<M: Mailer + ?Sized> Mailer for &M {
    fn send(&self, mail: &OutgoingMail) -> Result<(), MailError> {
        (**self).send(mail)
    }
}

/// Split a comma-separated recipient list, dropping blanks
pub fn parse_recipients(list: &str) -> Vec<String> {
    list.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Plain-text body summarizing the run
pub fn compose_body(stats: &RunStatistics, report_name: &str) -> String {
    format!(
        "Hello!\n\
         \n\
         Automated test run results\n\
         Total: {}\n\
         Errors: {}\n\
         Failures: {}\n\
         Passes: {}\n\
         Skipped: {}\n\
         \n\
         The detailed report is attached to this message ({}).\n",
        stats.total(),
        stats.errors(),
        stats.failures(),
        stats.passes(),
        stats.skipped(),
        report_name
    )
}
