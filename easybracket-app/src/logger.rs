//! The process logger. Records are written to stderr with a local timestamp and their source
//! location.
use std::fmt::Arguments;

use chrono::{DateTime, Local};
use log::{set_logger, set_max_level, Level, LevelFilter, Log, Metadata, Record, SetLoggerError};

/// Installs the [`Logger`] as the global logger, allowing records up to `level`.
///
/// # Errors
///
/// Returns a [`SetLoggerError`] if a global logger was already installed.
pub fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
    set_logger(&Logger)?;
    set_max_level(level);
    Ok(())
}

#[derive(Copy, Clone, Debug)]
pub struct Logger;

impl Log for Logger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }

        eprintln!(
            "{}",
            format(
                Local::now(),
                record.file().unwrap_or("???"),
                record.line().unwrap_or(0),
                record.level(),
                record.args()
            )
        );
    }

    fn flush(&self) {}
}

fn format(now: DateTime<Local>, file: &str, line: u32, level: Level, args: &Arguments) -> String {
    let level = match level {
        Level::Error => "ERROR",
        Level::Warn => "WARN",
        Level::Info => "INFO",
        Level::Debug => "DEBUG",
        Level::Trace => "TRACE",
    };

    format!(
        "[{}] [{}:{}] [{}] {}",
        now.format("%Y-%m-%d %H:%M:%S"),
        file,
        line,
        level,
        args
    )
}
