//! Finding record files.
//!
//! Ingestion reads a flat list of [`FindingRecord`]s from JSON or YAML and
//! hands them to the [`ReportBuilder`]. The scanner's native report format
//! is converted to this shape upstream.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;
use tracing::{debug, info};

use crate::error::Result;
use crate::model::{FindingRecord, Report, ReportBuilder};
use crate::severity::{Level, Thresholds};

#[derive(Debug, Error)]
pub enum InputError {
    #[error("Failed to read findings file {path}: {source}")]
    ReadFile {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse JSON findings {path}: {source}")]
    ParseJson {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to parse YAML findings {path}: {source}")]
    ParseYaml {
        path: String,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("Unsupported findings format for {0}: .{1}")]
    UnsupportedFormat(String, String),
}

/// Top-level document of a findings file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FindingFile {
    #[serde(default)]
    pub findings: Vec<FindingRecord>,
}

impl FindingFile {
    /// Read a findings file, choosing the parser by extension.
    pub fn from_path(path: &Path) -> std::result::Result<Self, InputError> {
        let content = fs::read_to_string(path).map_err(|e| InputError::ReadFile {
            path: path.display().to_string(),
            source: e,
        })?;

        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_lowercase();

        let file: FindingFile = match ext.as_str() {
            "json" => serde_json::from_str(&content).map_err(|e| InputError::ParseJson {
                path: path.display().to_string(),
                source: e,
            })?,
            "yaml" | "yml" => serde_yaml::from_str(&content).map_err(|e| InputError::ParseYaml {
                path: path.display().to_string(),
                source: e,
            })?,
            _ => {
                return Err(InputError::UnsupportedFormat(
                    path.display().to_string(),
                    ext,
                ));
            }
        };

        debug!(path = %path.display(), records = file.findings.len(), "read findings file");
        Ok(file)
    }

    /// Build a cross-linked report from the records.
    ///
    /// Record-level problems fail here; registry validation happens once,
    /// when the report is prepared for export.
    pub fn into_report(self, thresholds: Thresholds, min_level: Level) -> Result<Report> {
        let mut builder = ReportBuilder::new(thresholds).with_min_level(min_level);
        let added = builder.add_all(&self.findings)?;
        let filtered = builder.filtered();
        let report = builder.build();

        info!(
            records = self.findings.len(),
            added,
            filtered,
            vulnerabilities = report.vulnerabilities.len(),
            hosts = report.host_count(),
            "report built"
        );
        Ok(report)
    }
}

/// Read `path` and build a report from it.
pub fn load_report(path: &Path, thresholds: Thresholds, min_level: Level) -> Result<Report> {
    let file = FindingFile::from_path(path)?;
    file.into_report(thresholds, min_level)
}
