//! Configuration type definitions.

use serde::{Deserialize, Serialize};

use super::error::ConfigError;
use crate::severity::{Level, Thresholds};

/// Default number of rows in the host ranking table.
pub const DEFAULT_TOP_HOSTS: usize = 10;

/// Main configuration structure for vuln-report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// CVSS cut points between levels.
    pub thresholds: Thresholds,
    /// Findings classified below this level are dropped at ingestion.
    pub min_level: Level,
    /// Rows in the host ranking table.
    pub top_hosts: usize,
    /// Defaults for CLI output options.
    pub output: OutputConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            thresholds: Thresholds::default(),
            min_level: Level::None,
            top_hosts: DEFAULT_TOP_HOSTS,
            output: OutputConfig::default(),
        }
    }
}

impl Config {
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.thresholds
            .validate()
            .map_err(ConfigError::Thresholds)?;
        if self.top_hosts == 0 {
            return Err(ConfigError::TopHosts);
        }
        Ok(())
    }
}

/// Output defaults (corresponds to CLI options).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Report type: "vulnerability", "host", "summary".
    pub report_type: Option<String>,
    /// Output format: "terminal", "csv", "json".
    pub format: Option<String>,
}
