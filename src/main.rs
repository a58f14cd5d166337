// Main entry point for testsheet

mod commands;

use anyhow::Result;
use clap::Parser;
use tracing::info;

use testsheet::cli::Cli;
use testsheet::config::{self, Config, ReportConfig};

fn main() -> Result<()> {
    // Load configuration from file (if exists)
    let file_config = Config::load();

    let cli = Cli::parse();

    testsheet::logging::init(cli.verbose);

    if cli.verbose {
        info!("Starting testsheet v{}", env!("CARGO_PKG_VERSION"));
    }

    if cli.config {
        return print_config(&cli, file_config.as_ref());
    }

    if let Some(config_file) = &cli.init_config {
        std::fs::write(config_file, Config::with_defaults().to_toml())?;
        println!("Configuration file created: {}", config_file.display());
        println!("\nYou can now edit the file to customize your settings.");
        print_precedence();
        return Ok(());
    }

    if let Some(shell_type) = &cli.completion {
        return commands::handle_completion(shell_type);
    }

    let clean = commands::run_report(cli.get_run_args(), file_config.as_ref())?;
    if !clean {
        std::process::exit(1);
    }

    Ok(())
}

fn print_config(cli: &Cli, file_config: Option<&Config>) -> Result<()> {
    let resolved = ReportConfig::resolve(&cli.get_run_args().overrides(), file_config)?;
    let mail = &resolved.mail;

    println!("Current configuration:");
    println!("    Report file: {}", resolved.output_file.display());
    println!("    Suite name: {}", resolved.suite_name);
    println!("    SMTP server: {}:{}", mail.smtp.host, mail.smtp.port);
    println!(
        "    STARTTLS: {}",
        if mail.smtp.starttls {
            "enabled"
        } else {
            "disabled"
        }
    );
    println!(
        "    SMTP user: {}",
        mail.smtp.user.as_deref().unwrap_or("not set")
    );
    println!(
        "    SMTP password: {}",
        if mail.smtp.password.is_some() {
            "********"
        } else {
            "not set"
        }
    );
    println!("    Mail from: {}", mail.from.as_deref().unwrap_or("not set"));
    if mail.to.is_empty() {
        println!("    Mail to: not set (mail disabled)");
    } else {
        println!("    Mail to: {}", mail.to.join(", "));
    }
    println!("    Mail subject: {}", mail.subject);

    if file_config.is_some() {
        println!("\n  Configuration file loaded");
    } else {
        println!("\n  No configuration file loaded");
        println!("  Create one with: testsheet --init-config .testsheetrc.toml");
    }

    println!("\n  Environment variables:");
    for key in [
        config::ENV_FILE,
        config::ENV_SUITE_NAME,
        config::ENV_SMTP_SERVER,
        config::ENV_SMTP_PORT,
        config::ENV_SMTP_USER,
        config::ENV_SMTP_STARTTLS,
        config::ENV_MAIL_FROM,
        config::ENV_MAIL_TO,
        config::ENV_MAIL_SUBJECT,
    ] {
        let state = if std::env::var_os(key).is_some() {
            "set"
        } else {
            "not set"
        };
        println!("    {}: {}", key, state);
    }

    print_precedence();
    Ok(())
}

fn print_precedence() {
    println!("\nConfiguration precedence:");
    println!("  1. Command-line arguments (highest)");
    println!("  2. Configuration file");
    println!("  3. Environment variables");
    println!("  4. Built-in defaults (lowest)");
}
