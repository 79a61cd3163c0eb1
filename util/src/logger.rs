//! Logging setup for the drivebot executables
//!
//! Records go to the terminal and to the session's log file. Each line is
//! stamped with the seconds elapsed since the session started, so log lines
//! can be matched against the rows of the session's CSV archives.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External imports
use log::{info, Level, Record};
use colored::{ColoredString, Colorize};
use std::fmt::Arguments;
use thiserror::Error;

// Internal imports
use crate::session::{self, Session};

// Re-exports
pub use log::LevelFilter;

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

/// Targets which log every cycle at `trace` level. They are capped at `debug`
/// so tracing the controllers is not drowned out by the drivetrain.
const PER_STEP_TARGETS: &[&str] = &["bot_lib::sim::plant"];

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Errors associated with initialising the logger.
#[derive(Debug, Error)]
pub enum LoggerInitError {
    #[error("Minimum log level must be `info` or more verbose, found `{0}`")]
    InvalidMinLogLevel(LevelFilter),

    #[error("Cannot open the session log file: {0}")]
    LogFileInitError(std::io::Error),

    #[error("A logger has already been installed: {0}")]
    FernInitError(log::SetLoggerError)
}

// ---------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// ---------------------------------------------------------------------------

/// Install the logger for this execution.
///
/// `min_level` must be `Info`, `Debug` or `Trace`; warnings and errors are
/// never filtered out. Only one logger can be installed per process.
pub fn logger_init(
    min_level: LevelFilter,
    session: &Session
) -> Result<(), LoggerInitError> {

    if min_level < Level::Info {
        return Err(LoggerInitError::InvalidMinLogLevel(min_level))
    }

    let log_file = fern::log_file(&session.log_file_path)
        .map_err(LoggerInitError::LogFileInitError)?;

    let mut dispatch = fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!("{}", format_line(message, record)))
        })
        .level(min_level);

    for target in PER_STEP_TARGETS {
        dispatch = dispatch.level_for(*target, min_level.min(LevelFilter::Debug));
    }

    dispatch
        .chain(std::io::stdout())
        .chain(log_file)
        .apply()
        .map_err(LoggerInitError::FernInitError)?;

    info!("Logging to {:?} at {:?}", session.log_file_path, min_level);
    if let Ok(epoch) = session::get_epoch() {
        info!("Session epoch {}", epoch);
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// PRIVATE FUNCTIONS
// ---------------------------------------------------------------------------

/// Build one log line. Verbose records also name the module they came from.
fn format_line(message: &Arguments, record: &Record) -> String {
    let stamp = format!(
        "[{:10.6} {}]",
        session::get_elapsed_seconds(),
        level_tag(record.level())
    );

    if record.level() > Level::Info {
        format!("{} {}: {}", stamp, record.target(), message)
    }
    else {
        format!("{} {}", stamp, message)
    }
}

/// Three letter, coloured tag for a log level.
fn level_tag(level: Level) -> ColoredString {
    match level {
        Level::Trace => "TRC".dimmed().italic(),
        Level::Debug => "DBG".dimmed(),
        Level::Info  => "INF".normal(),
        Level::Warn  => "WRN".yellow(),
        Level::Error => "ERR".red().bold()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_verbose_lines_name_target() {
        let line = format_line(
            &format_args!("settled at {}", 3),
            &Record::builder()
                .args(format_args!("unused"))
                .level(Level::Debug)
                .target("bot_lib::pid::controller")
                .build()
        );
        assert!(line.contains("DBG"));
        assert!(line.ends_with("bot_lib::pid::controller: settled at 3"));

        let line = format_line(
            &format_args!("Calibration complete"),
            &Record::builder()
                .args(format_args!("unused"))
                .level(Level::Info)
                .target("bot_lib::calib")
                .build()
        );
        assert!(line.ends_with("] Calibration complete"));
        assert!(!line.contains("bot_lib::calib"));
    }
}
