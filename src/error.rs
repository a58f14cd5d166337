//! Error types for report rendering and mail delivery.

use std::path::PathBuf;

/// Failures of the end-of-run report step.
#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    /// The spreadsheet library rejected the document
    #[error("Failed to render spreadsheet: {0}")]
    Render(#[from] rust_xlsxwriter::XlsxError),

    /// The rendered document could not be written to disk
    #[error("Failed to write report file {}: {source}", .path.display())]
    Persist {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The report was written but mailing it failed
    #[error("Report written but mail delivery failed: {0}")]
    Mail(#[from] MailError),
}

/// Failures while composing or sending the report mail.
#[derive(Debug, thiserror::Error)]
pub enum MailError {
    /// Recipients are configured but no sender address is
    #[error("Mail sender is not configured")]
    MissingSender,

    /// A sender or recipient could not be parsed as a mailbox
    #[error("Invalid mail address '{address}': {source}")]
    Address {
        address: String,
        #[source]
        source: lettre::address::AddressError,
    },

    /// An attachment file could not be read
    #[error("Failed to read attachment {}: {source}", .path.display())]
    Attachment {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid attachment content type: {0}")]
    ContentType(#[from] lettre::message::header::ContentTypeErr),

    /// The MIME message could not be assembled
    #[error("Failed to build mail message: {0}")]
    Message(#[from] lettre::error::Error),

    /// Connection, authentication or delivery was refused
    #[error("SMTP transport error: {0}")]
    Transport(#[from] lettre::transport::smtp::Error),
}
