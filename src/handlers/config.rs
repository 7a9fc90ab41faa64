//! Configuration template handler.

use colored::Colorize;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::info;

use crate::config::{CONFIG_FILE_NAMES, Config, ConfigError};

/// Write the configuration template to `path`, or into it when `path` is a
/// directory. An existing file is never overwritten.
pub fn write_config_template(path: &Path) -> Result<PathBuf, String> {
    let output_path = if path.is_dir() {
        path.join(CONFIG_FILE_NAMES[0])
    } else {
        path.to_path_buf()
    };

    if output_path.exists() {
        return Err(format!(
            "Configuration file already exists at {}. Remove it first or specify a different path.",
            output_path.display()
        ));
    }

    fs::write(&output_path, Config::generate_template()).map_err(|e| {
        ConfigError::WriteFile {
            path: output_path.display().to_string(),
            source: e,
        }
        .to_string()
    })?;

    info!(path = %output_path.display(), "wrote configuration template");
    Ok(output_path)
}

/// Handle `--init-config`.
pub fn handle_init_config(path: &Path) -> ExitCode {
    match write_config_template(path) {
        Ok(output_path) => {
            println!(
                "Created configuration file template at {}",
                output_path.display()
            );
            println!("\nYou can customize this file to:");
            println!("  - Adjust the CVSS severity thresholds");
            println!("  - Drop findings below a minimum level");
            println!("  - Set the default report type and format");
            ExitCode::SUCCESS
        }
        Err(message) => {
            eprintln!("{} {}", "error:".red().bold(), message);
            ExitCode::from(2)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_init_config_creates_file_in_directory() {
        let temp_dir = TempDir::new().unwrap();

        let result = handle_init_config(temp_dir.path());
        assert_eq!(result, ExitCode::SUCCESS);

        let config_path = temp_dir.path().join(".vuln-report.yaml");
        assert!(config_path.exists());
        assert_eq!(Config::from_file(&config_path).unwrap(), Config::default());
    }

    #[test]
    fn test_init_config_explicit_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("custom.yaml");

        let written = write_config_template(&path).unwrap();
        assert_eq!(written, path);
        assert!(path.exists());
    }

    #[test]
    fn test_init_config_file_exists() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join(".vuln-report.yaml");
        fs::write(&config_path, "existing content").unwrap();

        let result = handle_init_config(temp_dir.path());
        assert_eq!(result, ExitCode::from(2));
        assert_eq!(fs::read_to_string(&config_path).unwrap(), "existing content");
    }
}
