//! Generic logger utility functions
//!
//! Log lines are stamped with the number of seconds since the session epoch
//! and a colored level tag. Debug and trace lines also carry the record
//! target, which makes per-cycle trace output attributable to a module.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External imports
use log::{self, info};
use fern;
use colored::{ColoredString, Colorize};
use serde::Deserialize;
use std::collections::HashMap;
use std::str::FromStr;
use thiserror::Error;

// Internal imports
use crate::session;

// Re-exports
pub use log::LevelFilter;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Logger configuration as found in an executable's parameter file.
#[derive(Debug, Clone, Deserialize)]
pub struct LogParams {
    /// Minimum level for all targets, e.g. `"trace"` or `"info"`.
    pub min_level: String,

    /// Per-target overrides, e.g. `{ "drive_lib::drive_act" = "debug" }`.
    #[serde(default)]
    pub target_levels: HashMap<String, String>
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Errors associated with initialising the logger.
#[derive(Debug, Error)]
pub enum LoggerInitError {
    #[error("Expected a minimum log level of at least `INFO`, found `{0}`")]
    InvalidMinLogLevel(log::LevelFilter),

    #[error("`{0}` is not a valid log level")]
    UnknownLevel(String),

    #[error("Error initialising the log file: {0}")]
    LogFileInitError(std::io::Error),

    #[error("An error occured while setting up the logger: {0}")]
    FernInitError(log::SetLoggerError)
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl LogParams {
    /// Parse the configured levels.
    pub fn levels(&self) -> Result<(LevelFilter, Vec<(String, LevelFilter)>), LoggerInitError> {
        let min_level = parse_level(&self.min_level)?;

        let mut targets = Vec::with_capacity(self.target_levels.len());
        for (target, level) in self.target_levels.iter() {
            targets.push((target.clone(), parse_level(level)?));
        }

        Ok((min_level, targets))
    }
}

// ---------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// ---------------------------------------------------------------------------

/// Initialise the logger for this execution.
/// 
/// # Notes
/// 
/// - `min_level` must be at least as verbose as `log::Level::Info`, the
///   task lifecycle is reported at info and must always reach the log file.
/// 
/// # Safety
/// 
/// - This function must only be called once to prevent corrupting logs.
pub fn logger_init(
    params: &LogParams,
    session: &session::Session
) -> Result<(), LoggerInitError> {

    let (min_level, target_levels) = params.levels()?;

    if min_level < log::Level::Info {
        return Err(LoggerInitError::InvalidMinLogLevel(min_level))
    }

    let mut dispatch = fern::Dispatch::new()
        .format(|out, message, record| {
            if record.level() > log::Level::Info {
                out.finish(format_args!(
                    "[{:10.6} {}] {}: {}",
                    session::get_elapsed_seconds(),
                    level_to_str(record.level()),
                    record.target(),
                    message
                ))
            }
            else {
                out.finish(format_args!(
                    "[{:10.6} {}] {}",
                    session::get_elapsed_seconds(),
                    level_to_str(record.level()),
                    message
                ))
            }
        })
        .level(min_level);

    for (target, level) in target_levels.iter() {
        dispatch = dispatch.level_for(target.clone(), *level);
    }

    let log_file = fern::log_file(session.log_file_path.clone())
        .map_err(LoggerInitError::LogFileInitError)?;

    dispatch
        .chain(std::io::stdout())
        .chain(log_file)
        .apply()
        .map_err(LoggerInitError::FernInitError)?;
    
    info!("Logging initialised");
    if let Some(epoch) = session::get_epoch() {
        info!("    Session epoch: {}", epoch);
    }
    info!("    Log level: {:?}", min_level);
    for (target, level) in target_levels.iter() {
        info!("    Log level for {}: {:?}", target, level);
    }
    info!("    Log file path: {:?}", session.log_file_path);

    Ok(())
}

// ---------------------------------------------------------------------------
// PRIVATE FUNCTIONS
// ---------------------------------------------------------------------------

fn parse_level(level: &str) -> Result<LevelFilter, LoggerInitError> {
    LevelFilter::from_str(level)
        .map_err(|_| LoggerInitError::UnknownLevel(String::from(level)))
}

/// Get the string representation of a log level
fn level_to_str(level: log::Level) -> ColoredString {
    match level {
        log::Level::Trace => "TRC".dimmed().italic(),
        log::Level::Debug => "DBG".dimmed(),
        log::Level::Info  => "INF".normal(),
        log::Level::Warn  => "WRN".yellow(),
        log::Level::Error => "ERR".red().bold()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_levels() {
        let mut target_levels = HashMap::new();
        target_levels.insert(String::from("drive_lib::drive_act"), String::from("debug"));

        let params = LogParams {
            min_level: String::from("trace"),
            target_levels
        };

        let (min, targets) = params.levels().unwrap();
        assert_eq!(min, LevelFilter::Trace);
        assert_eq!(targets, vec![(String::from("drive_lib::drive_act"), LevelFilter::Debug)]);

        let bad = LogParams {
            min_level: String::from("loud"),
            target_levels: HashMap::new()
        };
        assert!(matches!(bad.levels(), Err(LoggerInitError::UnknownLevel(_))));
    }
}
