//! Logger setup for the executables

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External imports
use std::collections::BTreeMap;
use std::str::FromStr;
use log::{self, info};
use fern;
use colored::{ColoredString, Colorize};
use serde::Deserialize;
use thiserror::Error;

// Internal imports
use crate::session;

// Re-exports
pub use log::LevelFilter;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Logging configuration, usually loaded as the `log` table of an exec's
/// parameter file.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LogParams {
    /// Minimum level for every target, e.g. `"debug"`.
    pub level: String,

    /// Per-target overrides, e.g. `"av_lib::av_ctrl" = "trace"`.
    pub targets: BTreeMap<String, String>,

    /// Mirror the log to stdout as well as the session log file.
    pub stdout: bool,
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Errors associated with initialising the logger.
#[derive(Debug, Error)]
pub enum LoggerInitError {
    #[error("Expected a log level of at least `INFO`, found `{0}`")]
    InvalidMinLogLevel(log::LevelFilter),

    #[error("Unknown log level `{0}`")]
    UnknownLevel(String),

    #[error("Error initialising the log file: {0}")]
    LogFileInitError(std::io::Error),

    #[error("An error occured while setting up the logger: {0}")]
    FernInitError(log::SetLoggerError)
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Default for LogParams {
    fn default() -> Self {
        Self {
            level: String::from("debug"),
            targets: BTreeMap::new(),
            stdout: true,
        }
    }
}

impl LogParams {
    /// Parse the minimum level and the per-target overrides.
    pub fn levels(&self) -> Result<(LevelFilter, Vec<(String, LevelFilter)>), LoggerInitError> {
        let min_level = parse_level(&self.level)?;

        let mut targets = Vec::with_capacity(self.targets.len());
        for (target, level) in self.targets.iter() {
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
/// - The minimum level must be at least `log::Level::Info`, per-target
///   overrides may be anything.
///
/// # Safety
///
/// - This function must only be called once to prevent corrupting logs.
pub fn logger_init(
    params: &LogParams,
    session: &session::Session
) -> Result<(), LoggerInitError> {

    let (min_level, targets) = params.levels()?;

    if min_level < log::Level::Info {
        return Err(LoggerInitError::InvalidMinLogLevel(min_level))
    }

    let mut dispatch = fern::Dispatch::new()
        .format(|out, message, record| {

            // If debug or trace include the target, otherwise don't include it
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

    for (target, level) in targets.iter() {
        dispatch = dispatch.level_for(target.clone(), *level);
    }

    if params.stdout {
        dispatch = dispatch.chain(std::io::stdout());
    }

    let log_file = fern::log_file(session.log_file_path.clone())
        .map_err(LoggerInitError::LogFileInitError)?;

    dispatch
        .chain(log_file)
        .apply()
        .map_err(LoggerInitError::FernInitError)?;

    info!("Logging initialised");
    info!("    Session epoch: {}", session::get_epoch());
    info!("    Log level: {:?}", min_level);
    for (target, level) in targets.iter() {
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
        let mut params = LogParams::default();
        params.targets.insert(String::from("av_lib::av_ctrl"), String::from("trace"));

        let (min, targets) = params.levels().unwrap();
        assert_eq!(min, LevelFilter::Debug);
        assert_eq!(targets, vec![(String::from("av_lib::av_ctrl"), LevelFilter::Trace)]);

        params.level = String::from("loud");
        match params.levels() {
            Err(LoggerInitError::UnknownLevel(l)) => assert_eq!(l, "loud"),
            r => panic!("Expected an unknown level error, got {:?}", r.map(|_| ()))
        }
    }
}
