use thiserror::Error;

use crate::config::ConfigError;
use crate::input::InputError;
use crate::severity::SeverityError;

#[derive(Error, Debug)]
pub enum ReportError {
    #[error("Invalid {entry}: {reason}")]
    InvalidEntry { entry: String, reason: String },

    #[error("Severity error: {0}")]
    Severity(#[from] SeverityError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Input error: {0}")]
    Input(#[from] InputError),

    #[error("Failed to write output: {path}")]
    WriteOutput {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Failed to format report: {0}")]
    Format(#[from] std::fmt::Error),
}

impl ReportError {
    pub fn invalid(entry: impl Into<String>, reason: impl Into<String>) -> Self {
        ReportError::InvalidEntry {
            entry: entry.into(),
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ReportError>;
