//! Configuration template generation.

use super::types::Config;

impl Config {
    /// Generate a YAML configuration template with comments.
    pub fn generate_template() -> String {
        r#"# vuln-report configuration file
# Place this file as .vuln-report.yaml next to your findings file

# =============================================================================
# SEVERITY THRESHOLDS
# =============================================================================
# A CVSS score belongs to the highest level whose cut point is <= the score.
# Scores below `low` (and the -1.0 "no CVSS" sentinel) are level `none`.
# Cut points must strictly ascend and lie in (0.0, 10.0].
thresholds:
  low: 0.1
  medium: 4.0
  high: 7.0
  critical: 9.0

# =============================================================================
# FILTERING
# =============================================================================
# Drop findings below this level: critical, high, medium, low, none
min_level: none

# =============================================================================
# OUTPUT
# =============================================================================
# Rows in the host ranking table
top_hosts: 10

# Defaults for --report-type and --format
# output:
#   report_type: vulnerability   # vulnerability, host, summary
#   format: terminal             # terminal, csv, json
"#
        .to_string()
    }
}
