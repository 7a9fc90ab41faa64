//! CLI command handlers.
//!
//! Handlers turn a parsed [`Cli`](crate::Cli) into an [`ExitCode`],
//! separated from main.rs to enable unit testing.

mod config;
mod report;

use std::path::Path;
use std::process::ExitCode;

use crate::Cli;

pub use config::{handle_init_config, write_config_template};
pub use report::{ReportSettings, render_report, run_report};

/// Dispatch on the parsed command line.
pub fn run(cli: &Cli) -> ExitCode {
    if cli.init_config {
        let target = cli.output.as_deref().unwrap_or(Path::new("."));
        return handle_init_config(target);
    }

    match cli.input.as_deref() {
        Some(input) => run_report(cli, input),
        None => {
            eprintln!("error: a findings file is required");
            ExitCode::from(2)
        }
    }
}
