//! Vulnerability report aggregation, classification and ranking.
//!
//! Scanner findings are loaded into a [`Report`]: a registry of hosts
//! ([`ResultTree`]) and the vulnerabilities shared between them. From there
//! [`aggregate`] produces the sorted view and per-level counters, the
//! [`ranking`] functions order hosts, and the [`reporter`]s render exports.

pub mod aggregator;
pub mod cli;
pub mod config;
pub mod error;
pub mod handlers;
pub mod input;
pub mod model;
pub mod ranking;
pub mod reporter;
pub mod severity;

#[cfg(test)]
pub mod test_utils;

pub use aggregator::{Collections, FamilyCounts, Summary, SummaryBuilder, aggregate};
pub use cli::{Cli, OutputFormat, ReportType};
pub use config::{Config, ConfigError};
pub use error::{ReportError, Result};
pub use input::{FindingFile, InputError, load_report};
pub use model::{
    FindingRecord, Host, HostKey, HostRef, Occurrence, Port, Report, ReportBuilder, ResultTree,
    Vulnerability,
};
pub use ranking::{HostRankings, rank_hosts_by_cumulative_cvss, rank_hosts_by_severity};
pub use reporter::{
    ReportContext, Reporter, csv::CsvReporter, json::JsonReporter, terminal::TerminalReporter,
};
pub use severity::{Level, LevelCounts, SeverityError, Thresholds, classify};
