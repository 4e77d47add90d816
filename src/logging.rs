// src/logging.rs

use log::{LevelFilter, SetLoggerError};
use std::io::Write;
use std::sync::Once;

/// Initialize the logging system with the specified log level
pub fn init_logging(level: LevelFilter) -> Result<(), SetLoggerError> {
    static INIT: Once = Once::new();

    INIT.call_once(|| {
        env_logger::Builder::new()
            .filter_level(level)
            .format(|buf, record| {
                writeln!(
                    buf,
                    "[{}] {} - {}",
                    buf.timestamp_millis(),
                    record.level(),
                    record.args()
                )
            })
            .init();
    });

    Ok(())
}

/// Parse a textual log level, `None` when unrecognised
pub fn parse_level(level: &str) -> Option<LevelFilter> {
    match level.to_lowercase().as_str() {
        "trace" => Some(LevelFilter::Trace),
        "debug" => Some(LevelFilter::Debug),
        "info" => Some(LevelFilter::Info),
        "warn" => Some(LevelFilter::Warn),
        "error" => Some(LevelFilter::Error),
        _ => None,
    }
}

/// Severity for the `[ALERT]`, `[STORE]` and `[NOTIFY]` macros
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Debug,
    Info,
    Warn,
    Error,
}

impl From<LogLevel> for log::Level {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Debug => log::Level::Debug,
            LogLevel::Info => log::Level::Info,
            LogLevel::Warn => log::Level::Warn,
            LogLevel::Error => log::Level::Error,
        }
    }
}

#[doc(hidden)]
#[macro_export]
macro_rules! tagged_log {
    ($tag:literal, $level:expr, $($arg:tt)*) => {
        log::log!(log::Level::from($level), "{} {}", $tag, format_args!($($arg)*))
    };
}

#[macro_export]
macro_rules! alert_log {
    ($level:expr, $($arg:tt)*) => {
        $crate::tagged_log!("[ALERT]", $level, $($arg)*)
    };
}

#[macro_export]
macro_rules! store_log {
    ($level:expr, $($arg:tt)*) => {
        $crate::tagged_log!("[STORE]", $level, $($arg)*)
    };
}

#[macro_export]
macro_rules! notify_log {
    ($level:expr, $($arg:tt)*) => {
        $crate::tagged_log!("[NOTIFY]", $level, $($arg)*)
    };
}
