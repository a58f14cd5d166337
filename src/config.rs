// Configuration file handling and option resolution

use crate::mail::{SmtpSettings, parse_recipients};
use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub report: ReportSection,

    #[serde(default)]
    pub mail: MailSection,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ReportSection {
    /// Path of the generated workbook
    #[serde(default)]
    pub output_file: Option<String>,

    /// Suite name shown in the summary block
    #[serde(default)]
    pub suite_name: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct MailSection {
    #[serde(default)]
    pub smtp_host: Option<String>,

    #[serde(default)]
    pub smtp_port: Option<u16>,

    #[serde(default)]
    pub smtp_user: Option<String>,

    #[serde(default)]
    pub smtp_password: Option<String>,

    /// Negotiate STARTTLS before login
    #[serde(default)]
    pub smtp_starttls: Option<bool>,

    #[serde(default)]
    pub from: Option<String>,

    /// Comma-separated recipients; empty disables mailing
    #[serde(default)]
    pub to: Option<String>,

    #[serde(default)]
    pub subject: Option<String>,
}

// Environment overrides
pub const ENV_FILE: &str = "TESTSHEET_FILE";
pub const ENV_SUITE_NAME: &str = "TESTSHEET_SUITE_NAME";
pub const ENV_SMTP_SERVER: &str = "TESTSHEET_SMTP_SERVER";
pub const ENV_SMTP_PORT: &str = "TESTSHEET_SMTP_PORT";
pub const ENV_SMTP_USER: &str = "TESTSHEET_SMTP_USER";
pub const ENV_SMTP_PASSWORD: &str = "TESTSHEET_SMTP_PASSWORD";
pub const ENV_SMTP_STARTTLS: &str = "TESTSHEET_SMTP_STARTTLS";
pub const ENV_MAIL_FROM: &str = "TESTSHEET_MAIL_FROM";
pub const ENV_MAIL_TO: &str = "TESTSHEET_MAIL_TO";
pub const ENV_MAIL_SUBJECT: &str = "TESTSHEET_MAIL_SUBJECT";

// Default values
pub fn default_output_file() -> String {
    String::from("nosetests.xlsx")
}

pub fn default_suite_name() -> String {
    String::from("nosetests")
}

pub fn default_smtp_host() -> String {
    String::from("smtp.gmail.com")
}

pub fn default_smtp_port() -> u16 {
    587
}

pub fn default_mail_subject(today: NaiveDate) -> String {
    format!("Automated test run results for {}", today)
}

impl Config {
    /// Load configuration from default locations
    pub fn load() -> Option<Self> {
        // Checked in order:
        // 1. .testsheetrc (current directory)
        // 2. ~/.testsheetrc (home directory)
        // 3. .testsheetrc.toml (current directory)
        // 4. ~/.testsheetrc.toml (home directory)

        let cwd = std::env::current_dir().ok()?;
        let home = dirs::home_dir()?;

        let paths = [
            cwd.join(".testsheetrc"),
            home.join(".testsheetrc"),
            cwd.join(".testsheetrc.toml"),
            home.join(".testsheetrc.toml"),
        ];

        paths
            .iter()
            .find(|path| path.exists())
            .and_then(|path| Self::load_from_file(path))
    }

    /// Load configuration from a specific file
    pub fn load_from_file(path: &Path) -> Option<Self> {
        let content = std::fs::read_to_string(path).ok()?;
        Self::parse(&content)
    }

    /// Parse configuration from TOML string
    pub fn parse(content: &str) -> Option<Self> {
        toml::from_str(content).ok()
    }

    /// Configuration with every default spelled out, for `--init-config`
    pub fn with_defaults() -> Self {
        Self {
            report: ReportSection {
                output_file: Some(default_output_file()),
                suite_name: Some(default_suite_name()),
            },
            mail: MailSection {
                smtp_host: Some(default_smtp_host()),
                smtp_port: Some(default_smtp_port()),
                smtp_user: None,
                smtp_password: None,
                smtp_starttls: Some(true),
                from: None,
                to: None,
                subject: None,
            },
        }
    }

    /// Generate configuration as TOML
    pub fn to_toml(&self) -> String {
        toml::to_string_pretty(self).unwrap_or_else(|_| String::new())
    }
}

/// Values given on the command line; each wins over every other source
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub output_file: Option<PathBuf>,
    pub suite_name: Option<String>,
    pub smtp_host: Option<String>,
    pub smtp_port: Option<u16>,
    pub smtp_user: Option<String>,
    pub smtp_password: Option<String>,
    pub no_starttls: bool,
    pub mail_from: Option<String>,
    pub mail_to: Option<String>,
    pub mail_subject: Option<String>,
}

/// Mail delivery settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MailConfig {
    pub smtp: SmtpSettings,
    pub from: Option<String>,
    /// Empty means the mail step is skipped
    pub to: Vec<String>,
    pub subject: String,
}

/// Fully resolved settings handed to the reporter
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportConfig {
    /// Absolute path of the workbook
    pub output_file: PathBuf,
    pub suite_name: String,
    pub mail: MailConfig,
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

impl ReportConfig {
    /// Resolve settings from the process environment.
    ///
    /// Precedence: command line, then configuration file, then environment,
    /// then built-in defaults.
    pub fn resolve(overrides: &ConfigOverrides, file: Option<&Config>) -> Result<Self> {
        Self::resolve_with(overrides, file, |key| std::env::var(key).ok())
    }

    /// Same as [`ReportConfig::resolve`] with an explicit environment lookup
    pub fn resolve_with(
        overrides: &ConfigOverrides,
        file: Option<&Config>,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<Self> {
        let file = file.cloned().unwrap_or_default();
        let lookup = |key: &str| env(key).filter(|v| !v.is_empty());

        let output_file = match &overrides.output_file {
            Some(path) => path.clone(),
            None => PathBuf::from(
                file.report
                    .output_file
                    .or_else(|| lookup(ENV_FILE))
                    .unwrap_or_else(default_output_file),
            ),
        };
        let output_file = std::path::absolute(&output_file).with_context(|| {
            format!("Failed to resolve report path: {}", output_file.display())
        })?;

        let suite_name = overrides
            .suite_name
            .clone()
            .or(file.report.suite_name)
            .or_else(|| lookup(ENV_SUITE_NAME))
            .unwrap_or_else(default_suite_name);

        let mail = file.mail;
        let port = match overrides.smtp_port.or(mail.smtp_port) {
            Some(port) => port,
            None => match lookup(ENV_SMTP_PORT) {
                Some(raw) => raw
                    .trim()
                    .parse()
                    .with_context(|| format!("Invalid {}: {}", ENV_SMTP_PORT, raw))?,
                None => default_smtp_port(),
            },
        };

        let starttls = if overrides.no_starttls {
            false
        } else {
            mail.smtp_starttls
                .or_else(|| lookup(ENV_SMTP_STARTTLS).and_then(|v| parse_flag(&v)))
                .unwrap_or(true)
        };

        let smtp = SmtpSettings {
            host: overrides
                .smtp_host
                .clone()
                .or(mail.smtp_host)
                .or_else(|| lookup(ENV_SMTP_SERVER))
                .unwrap_or_else(default_smtp_host),
            port,
            user: overrides
                .smtp_user
                .clone()
                .or(mail.smtp_user)
                .or_else(|| lookup(ENV_SMTP_USER)),
            password: overrides
                .smtp_password
                .clone()
                .or(mail.smtp_password)
                .or_else(|| lookup(ENV_SMTP_PASSWORD)),
            starttls,
        };

        let to = overrides
            .mail_to
            .clone()
            .or(mail.to)
            .or_else(|| lookup(ENV_MAIL_TO))
            .map(|list| parse_recipients(&list))
            .unwrap_or_default();

        Ok(Self {
            output_file,
            suite_name,
            mail: MailConfig {
                smtp,
                from: overrides
                    .mail_from
                    .clone()
                    .or(mail.from)
                    .or_else(|| lookup(ENV_MAIL_FROM)),
                to,
                subject: overrides
                    .mail_subject
                    .clone()
                    .or(mail.subject)
                    .or_else(|| lookup(ENV_MAIL_SUBJECT))
                    .unwrap_or_else(|| default_mail_subject(Local::now().date_naive())),
            },
        })
    }
}
