use clap::{Parser, ValueEnum};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use crate::severity::Level;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Default)]
pub enum OutputFormat {
    #[default]
    Terminal,
    Csv,
    Json,
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "terminal" => Ok(OutputFormat::Terminal),
            "csv" => Ok(OutputFormat::Csv),
            "json" => Ok(OutputFormat::Json),
            other => Err(format!("unknown output format: {}", other)),
        }
    }
}

/// Which view of the findings an export is built around.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Default)]
pub enum ReportType {
    /// One section per vulnerability, most severe first
    #[default]
    Vulnerability,
    /// One section per host, by cumulative CVSS
    Host,
    /// Level summary only
    Summary,
}

impl FromStr for ReportType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "vulnerability" | "vuln" => Ok(ReportType::Vulnerability),
            "host" => Ok(ReportType::Host),
            "summary" => Ok(ReportType::Summary),
            other => Err(format!("unknown report type: {}", other)),
        }
    }
}

impl fmt::Display for ReportType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ReportType::Vulnerability => "vulnerability",
            ReportType::Host => "host",
            ReportType::Summary => "summary",
        };
        write!(f, "{}", name)
    }
}

#[derive(Parser, Debug)]
#[command(
    name = "vuln-report",
    version,
    about = "Aggregate, classify and rank vulnerability scan findings",
    long_about = "vuln-report reads scanner findings, classifies them by CVSS severity, ranks the affected hosts and exports CSV, JSON or terminal reports."
)]
pub struct Cli {
    /// Findings file (.json, .yaml, .yml)
    #[arg(required_unless_present = "init_config")]
    pub input: Option<PathBuf>,

    /// Report type (defaults to the config file, then vulnerability)
    #[arg(short = 'r', long, value_enum)]
    pub report_type: Option<ReportType>,

    /// Output format (defaults to the config file, then terminal)
    #[arg(short, long, value_enum)]
    pub format: Option<OutputFormat>,

    /// Write the report to this file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Configuration file (otherwise searched next to the input)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Drop findings below this level (critical, high, medium, low, none)
    #[arg(short = 'l', long)]
    pub min_level: Option<Level>,

    /// Number of hosts in the ranking table
    #[arg(short = 'n', long)]
    pub top_hosts: Option<usize>,

    /// Write a commented configuration template to .vuln-report.yaml (or --output)
    #[arg(long)]
    pub init_config: bool,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}
