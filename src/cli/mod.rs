//! Command-line interface.

pub mod commands;
pub mod context;
pub mod output;
pub mod types;

use anyhow::Result;
use console::style;

use crate::domain::models::LoggingConfig;
use crate::infrastructure::logging::{ConsoleTarget, LogConfig, LoggerImpl};

pub use types::{Cli, Commands};

/// Install the tracing subscriber for a CLI run.
///
/// Console logs always go to stderr so stdout carries only command output.
pub fn init_logging(logging: &LoggingConfig) -> Result<LoggerImpl> {
    let config = LogConfig::try_from(logging)
        .map_err(anyhow::Error::msg)?
        .with_target(ConsoleTarget::Stderr);
    LoggerImpl::init(&config)
}

/// Report a command failure and exit with status 1.
pub fn handle_error(err: anyhow::Error, json_mode: bool) -> ! {
    if json_mode {
        let causes: Vec<String> = err.chain().skip(1).map(ToString::to_string).collect();
        let body = serde_json::json!({
            "error": err.to_string(),
            "causes": causes,
        });
        println!("{}", serde_json::to_string_pretty(&body).unwrap_or_default());
    } else {
        eprintln!("{} {err:#}", style("Error:").red().bold());
    }
    std::process::exit(1)
}
