//! Configuration layer for vuln-report.
//!
//! ## Layers
//! - `types`: Configuration type definitions
//! - `loading`: File loading logic
//! - `parsers`: String to enum parsing for config values
//! - `template`: Commented starter configuration

mod error;
mod loading;
mod parsers;
mod template;
mod types;

pub use error::ConfigError;
pub use loading::CONFIG_FILE_NAMES;
pub use parsers::{parse_output_format, parse_report_type};
pub use types::{Config, DEFAULT_TOP_HOSTS, OutputConfig};

#[cfg(test)]
mod tests {
    use super::*;
    use crate::severity::{Level, Thresholds};
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.thresholds, Thresholds::default());
        assert_eq!(config.min_level, Level::None);
        assert_eq!(config.top_hosts, 10);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_yaml_config() {
        let dir = TempDir::new().unwrap();
        let config_path = dir.path().join(".vuln-report.yaml");
        fs::write(
            &config_path,
            r#"
thresholds:
  low: 1.0
  medium: 3.0
  high: 6.0
  critical: 8.5
min_level: medium
top_hosts: 5
"#,
        )
        .unwrap();

        let config = Config::from_file(&config_path).unwrap();
        assert_eq!(config.thresholds.critical, 8.5);
        assert_eq!(config.min_level, Level::Medium);
        assert_eq!(config.top_hosts, 5);
    }

    #[test]
    fn test_load_json_config() {
        let dir = TempDir::new().unwrap();
        let config_path = dir.path().join(".vuln-report.json");
        fs::write(
            &config_path,
            r#"{"min_level": "high", "output": {"format": "csv"}}"#,
        )
        .unwrap();

        let config = Config::from_file(&config_path).unwrap();
        assert_eq!(config.min_level, Level::High);
        assert_eq!(config.output.format.as_deref(), Some("csv"));
        assert_eq!(config.thresholds, Thresholds::default());
    }

    #[test]
    fn test_load_toml_config() {
        let dir = TempDir::new().unwrap();
        let config_path = dir.path().join(".vuln-report.toml");
        fs::write(
            &config_path,
            r#"
top_hosts = 3

[thresholds]
critical = 9.5
"#,
        )
        .unwrap();

        let config = Config::from_file(&config_path).unwrap();
        assert_eq!(config.top_hosts, 3);
        assert_eq!(config.thresholds.critical, 9.5);
        assert_eq!(config.thresholds.high, 7.0);
    }

    #[test]
    fn test_unordered_thresholds_rejected() {
        let dir = TempDir::new().unwrap();
        let config_path = dir.path().join("bad.yaml");
        fs::write(
            &config_path,
            "thresholds:\n  medium: 8.0\n  high: 7.0\n",
        )
        .unwrap();

        let err = Config::from_file(&config_path).unwrap_err();
        assert!(matches!(err, ConfigError::Thresholds(_)));
    }

    #[test]
    fn test_zero_top_hosts_rejected() {
        let dir = TempDir::new().unwrap();
        let config_path = dir.path().join("bad.json");
        fs::write(&config_path, r#"{"top_hosts": 0}"#).unwrap();

        let err = Config::from_file(&config_path).unwrap_err();
        assert!(matches!(err, ConfigError::TopHosts));
    }

    #[test]
    fn test_unsupported_extension() {
        let dir = TempDir::new().unwrap();
        let config_path = dir.path().join("config.ini");
        fs::write(&config_path, "top_hosts=3").unwrap();

        let err = Config::from_file(&config_path).unwrap_err();
        assert!(err.to_string().contains("Unsupported config format"));
    }

    #[test]
    fn test_invalid_yaml_reports_path() {
        let dir = TempDir::new().unwrap();
        let config_path = dir.path().join("broken.yaml");
        fs::write(&config_path, "min_level: [unterminated").unwrap();

        let err = Config::from_file(&config_path).unwrap_err();
        assert!(err.to_string().contains("broken.yaml"));
    }

    #[test]
    fn test_missing_file() {
        let err = Config::from_file(std::path::Path::new("/nonexistent/.vuln-report.yaml"))
            .unwrap_err();
        assert!(matches!(err, ConfigError::ReadFile { .. }));
    }

    #[test]
    fn test_load_prefers_project_file() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(".vuln-report.yml"), "top_hosts: 4\n").unwrap();

        let config = Config::load(Some(dir.path())).unwrap();
        assert_eq!(config.top_hosts, 4);
    }

    #[test]
    fn test_load_surfaces_broken_project_file() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(".vuln-report.json"), "{not json").unwrap();

        assert!(Config::load(Some(dir.path())).is_err());
    }
}
