// CLI argument definitions using Clap

use crate::config::ConfigOverrides;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Collect test verdicts into an Excel report and mail it
#[derive(Parser, Debug)]
#[command(name = "testsheet")]
#[command(author = "testsheet contributors")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Turn test run results into an Excel report", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    // Flattened so that `cargo test ... | testsheet` works without `run`.
    #[command(flatten)]
    pub run_args: RunArgs,

    /// Enable verbose logging
    #[arg(short = 'v', long, global = true, default_value_t = false)]
    pub verbose: bool,

    /// Print the effective configuration and exit
    #[arg(long, default_value_t = false)]
    pub config: bool,

    /// Write a default configuration file and exit
    #[arg(long, value_name = "FILE")]
    pub init_config: Option<PathBuf>,

    /// Generate shell completion script (bash, zsh, fish, powershell)
    #[arg(long, value_name = "SHELL")]
    pub completion: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Read libtest JSON events and write the report
    Run(RunArgs),
}

#[derive(Args, Debug, Clone, Default)]
pub struct RunArgs {
    /// libtest JSON event file; reads stdin when omitted or `-`
    #[arg(value_name = "INPUT")]
    pub input: Option<PathBuf>,

    /// Path of the Excel report [env: TESTSHEET_FILE]
    #[arg(short = 'o', long = "excel-file", value_name = "FILE")]
    pub excel_file: Option<PathBuf>,

    /// Suite name shown in the report [env: TESTSHEET_SUITE_NAME]
    #[arg(long = "excel-testsuite-name", value_name = "NAME")]
    pub suite_name: Option<String>,

    /// SMTP server host [env: TESTSHEET_SMTP_SERVER]
    #[arg(long, value_name = "HOST")]
    pub smtp_server: Option<String>,

    /// SMTP server port [env: TESTSHEET_SMTP_PORT]
    #[arg(long, value_name = "PORT")]
    pub smtp_port: Option<u16>,

    /// SMTP login [env: TESTSHEET_SMTP_USER]
    #[arg(long, value_name = "USER")]
    pub smtp_user: Option<String>,

    /// SMTP password [env: TESTSHEET_SMTP_PASSWORD]
    #[arg(long, value_name = "PASSWORD")]
    pub smtp_password: Option<String>,

    /// Send without negotiating STARTTLS
    #[arg(long, default_value_t = false)]
    pub no_starttls: bool,

    /// Sender address [env: TESTSHEET_MAIL_FROM]
    #[arg(long, value_name = "ADDRESS")]
    pub mail_from: Option<String>,

    /// Comma-separated recipients; no mail is sent when empty [env: TESTSHEET_MAIL_TO]
    #[arg(long, value_name = "ADDRESSES")]
    pub mail_to: Option<String>,

    /// Mail subject [env: TESTSHEET_MAIL_SUBJECT]
    #[arg(long, value_name = "SUBJECT")]
    pub mail_subject: Option<String>,
}

impl RunArgs {
    /// Command-line layer of the configuration
    pub fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            output_file: self.excel_file.clone(),
            suite_name: self.suite_name.clone(),
            smtp_host: self.smtp_server.clone(),
            smtp_port: self.smtp_port,
            smtp_user: self.smtp_user.clone(),
            smtp_password: self.smtp_password.clone(),
            no_starttls: self.no_starttls,
            mail_from: self.mail_from.clone(),
            mail_to: self.mail_to.clone(),
            mail_subject: self.mail_subject.clone(),
        }
    }

    /// Input file, or `None` for stdin
    pub fn input_file(&self) -> Option<&PathBuf> {
        self.input.as_ref().filter(|p| p.as_os_str() != "-")
    }
}

impl Cli {
    /// Helper to get effective RunArgs
    pub fn get_run_args(&self) -> &RunArgs {
        match &self.command {
            Some(Commands::Run(args)) => args,
            None => &self.run_args,
        }
    }
}
