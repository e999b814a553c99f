//! Verbosity gate for the crate's diagnostic output.
//!
//! Events go through `tracing`, so the sink is whatever subscriber the process
//! installs. The level set on the client decides which events are emitted at all.

use std::fmt;

/// How chatty the client is. Each level includes everything below it.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum LogLevel {
    /// No output.
    #[default]
    Silent = 0,
    /// Failed requests and construction errors.
    Errors = 1,
    /// Adds one line per outgoing request.
    Info = 2,
    /// Adds request timings and raw response bodies.
    Debug = 3,
}

impl LogLevel {
    /// Whether an event at `at` should be emitted under this level.
    pub fn enabled(self, at: LogLevel) -> bool {
        at != LogLevel::Silent && self >= at
    }
}

impl From<u8> for LogLevel {
    fn from(v: u8) -> Self {
        match v {
            0 => Self::Silent,
            1 => Self::Errors,
            2 => Self::Info,
            _ => Self::Debug,
        }
    }
}

impl From<LogLevel> for u8 {
    fn from(level: LogLevel) -> Self {
        level as u8
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Silent => "silent",
            Self::Errors => "errors",
            Self::Info => "info",
            Self::Debug => "debug",
        };
        f.write_str(s)
    }
}

/// Emit a `tracing` event only when the session's level allows it.
///
/// `log_at!(session, Errors, error, "...", args)`
macro_rules! log_at {
    ($session:expr, $level:ident, $mac:ident, $($arg:tt)+) => {
        if $session
            .log_level()
            .enabled($crate::core::log::LogLevel::$level)
        {
            ::tracing::$mac!(target: "finance_rs", $($arg)+);
        }
    };
}

pub(crate) use log_at;
