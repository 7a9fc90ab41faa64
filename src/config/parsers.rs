//! String parsers for configuration values.
//!
//! These functions parse string representations from config files into
//! typed enums.

use crate::cli::{OutputFormat, ReportType};

/// Parse output format from string using FromStr.
pub fn parse_output_format(s: Option<&str>) -> Option<OutputFormat> {
    s?.parse().ok()
}

/// Parse report type from string using FromStr.
pub fn parse_report_type(s: Option<&str>) -> Option<ReportType> {
    s?.parse().ok()
}
