// Run command - feed libtest events through the plugin and write the report

use anyhow::{Context, Result};
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use tracing::info;

use testsheet::cli::RunArgs;
use testsheet::config::{Config, ReportConfig};
use testsheet::host::LibtestFeed;
use testsheet::plugin::RunListener;
use testsheet::{Collector, ExcelPlugin, ExcelReporter};

/// Returns whether the run was clean (no failures, no errors)
pub fn run_report(args: &RunArgs, file_config: Option<&Config>) -> Result<bool> {
    let config = ReportConfig::resolve(&args.overrides(), file_config)?;
    info!("Report path: {}", config.output_file.display());
    if !config.mail.to.is_empty() {
        info!(
            "Report will be mailed to {} via {}:{}",
            config.mail.to.join(", "),
            config.mail.smtp.host,
            config.mail.smtp.port
        );
    }

    let mut plugin = ExcelPlugin::new(Collector::new(), ExcelReporter::new(config));

    let reader: Box<dyn BufRead> = match args.input_file() {
        Some(path) => Box::new(BufReader::new(File::open(path).with_context(|| {
            format!("Failed to open libtest output: {}", path.display())
        })?)),
        None => Box::new(io::stdin().lock()),
    };

    let summary = LibtestFeed::new(&mut plugin).consume(reader)?;
    info!(
        "Read {} line(s), {} verdict(s), {} non-event line(s)",
        summary.lines, summary.verdicts, summary.ignored_lines
    );

    let mut stdout = io::stdout().lock();
    plugin.on_run_end(&mut stdout)?;

    Ok(plugin.state().stats().is_clean())
}
