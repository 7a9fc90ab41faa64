//! Report generation handler.

use colored::Colorize;
use std::fs;
use std::path::Path;
use std::process::ExitCode;
use tracing::{debug, info, warn};

use crate::cli::{Cli, OutputFormat, ReportType};
use crate::config::{Config, ConfigError, parse_output_format, parse_report_type};
use crate::error::{ReportError, Result};
use crate::input::load_report;
use crate::reporter::{
    ReportContext, Reporter, csv::CsvReporter, json::JsonReporter, terminal::TerminalReporter,
};
use crate::severity::{Level, Thresholds};

/// Effective settings after merging the config file with CLI overrides.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportSettings {
    pub thresholds: Thresholds,
    pub min_level: Level,
    pub top_hosts: usize,
    pub report_type: ReportType,
    pub format: OutputFormat,
}

impl ReportSettings {
    /// CLI flags win over config values, config values over defaults.
    pub fn resolve(cli: &Cli, config: &Config) -> Result<Self> {
        let top_hosts = cli.top_hosts.unwrap_or(config.top_hosts);
        if top_hosts == 0 {
            return Err(ConfigError::TopHosts.into());
        }

        let report_type = cli.report_type.unwrap_or_else(|| {
            let configured = config.output.report_type.as_deref();
            parse_report_type(configured).unwrap_or_else(|| {
                if let Some(value) = configured {
                    warn!(value, "unknown report_type in config, using default");
                }
                ReportType::default()
            })
        });

        let format = cli.format.unwrap_or_else(|| {
            let configured = config.output.format.as_deref();
            parse_output_format(configured).unwrap_or_else(|| {
                if let Some(value) = configured {
                    warn!(value, "unknown format in config, using default");
                }
                OutputFormat::default()
            })
        });

        Ok(Self {
            thresholds: config.thresholds,
            min_level: cli.min_level.unwrap_or(config.min_level),
            top_hosts,
            report_type,
            format,
        })
    }
}

/// Explicit `--config`, otherwise the search next to the input file.
fn load_config(cli: &Cli, input: &Path) -> Result<Config> {
    let config = match &cli.config {
        Some(path) => Config::from_file(path)?,
        None => Config::load(input.parent())?,
    };
    Ok(config)
}

/// Render the report for `input` as configured by `cli`.
pub fn render_report(cli: &Cli, input: &Path) -> Result<String> {
    let config = load_config(cli, input)?;
    let settings = ReportSettings::resolve(cli, &config)?;
    debug!(?settings, "resolved report settings");

    let report = load_report(input, settings.thresholds, settings.min_level)?;
    let ctx = ReportContext::new(&report, settings.top_hosts)?;

    let output = match settings.format {
        OutputFormat::Csv => CsvReporter::new(settings.report_type).report(&ctx)?,
        OutputFormat::Json => JsonReporter::new().report(&ctx)?,
        OutputFormat::Terminal => {
            if cli.output.is_some() {
                colored::control::set_override(false);
            }
            TerminalReporter::new(cli.verbose > 0).report(&ctx)?
        }
    };

    info!(
        format = ?settings.format,
        report_type = %settings.report_type,
        bytes = output.len(),
        "report rendered"
    );
    Ok(output)
}

fn write_output(path: &Path, output: &str) -> Result<()> {
    fs::write(path, output).map_err(|e| ReportError::WriteOutput {
        path: path.display().to_string(),
        source: e,
    })
}

/// Run report mode: render, then print or write the result.
pub fn run_report(cli: &Cli, input: &Path) -> ExitCode {
    info!(input = %input.display(), "generating report");

    let result = render_report(cli, input).and_then(|output| match &cli.output {
        Some(path) => {
            write_output(path, &output)?;
            eprintln!("Report written to {}", path.display());
            Ok(())
        }
        None => {
            print!("{}", output);
            Ok(())
        }
    });

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {}", "error:".red().bold(), error_chain(&e));
            ExitCode::from(2)
        }
    }
}

/// `e` followed by its sources, separated by `: `.
fn error_chain(e: &dyn std::error::Error) -> String {
    let mut message = e.to_string();
    let mut source = e.source();
    while let Some(cause) = source {
        let cause_text = cause.to_string();
        if !message.contains(&cause_text) {
            message.push_str(": ");
            message.push_str(&cause_text);
        }
        source = cause.source();
    }
    message
}
