pub mod cli;
pub mod collector;
pub mod config;
pub mod error;
pub mod host;
pub mod logging;
pub mod mail;
pub mod plugin;
pub mod report;
pub mod state;
pub mod time;

pub use collector::{Collector, ErrorKind, FailureInfo};
pub use config::ReportConfig;
pub use error::{MailError, ReportError};
pub use plugin::{ExcelPlugin, RunListener};
pub use report::ExcelReporter;
