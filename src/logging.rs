//! Logger setup.
//!
//! The TUI owns the terminal, so in interactive mode logs only go to a file
//! (when one is configured) and are otherwise switched off.

use std::fs::OpenOptions;
use std::path::Path;

use env_logger::{Env, Target};
use log::LevelFilter;

use crate::error::AppError;

/// Install the global logger. `RUST_LOG` overrides the default `warn` filter.
pub fn init(log_file: Option<&Path>, interactive: bool) -> Result<(), AppError> {
    if interactive && log_file.is_none() {
        log::set_max_level(LevelFilter::Off);
        return Ok(());
    }

    let mut builder = env_logger::Builder::from_env(Env::default().default_filter_or("warn"));
    builder.format_timestamp_millis();

    if let Some(path) = log_file {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(|e| AppError::io(format!("Failed to open log file '{}': {e}", path.display())))?;
        builder.target(Target::Pipe(Box::new(file)));
    }

    builder
        .try_init()
        .map_err(|e| AppError::io(format!("Failed to initialize logging: {e}")))
}
