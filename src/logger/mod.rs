//! Logging for running server instances.
//!
//! Each instance owns its logger, so independent servers write to
//! independent sinks. The mode is decided once at startup from the
//! `logging` setting and never changes while the server runs.

mod format;
mod writer;

pub use format::AccessLogEntry;

use crate::config::LogSetting;
use crate::error::LogInitError;
use std::path::PathBuf;
use std::sync::Arc;
use writer::LogSink;

/// Name of the log file created inside the configured directory.
pub const LOG_FILE_NAME: &str = "static-server.txt";

/// Resolved logging mode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogMode {
    /// Emergency-only severity; nothing this crate emits gets through.
    Silent,
    /// Debug logging to stderr, no per-request access lines.
    Debug,
    /// Debug and access logging to [`LOG_FILE_NAME`] in the directory.
    DebugWithAccessLog(PathBuf),
}

impl LogMode {
    /// Map the `logging` startup option onto a mode.
    pub fn from_setting(setting: &LogSetting) -> Self {
        match setting {
            LogSetting::Enabled(false) => Self::Silent,
            LogSetting::Enabled(true) => Self::Debug,
            LogSetting::Directory(dir) => Self::DebugWithAccessLog(dir.clone()),
        }
    }
}

/// Message severities, most urgent first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Level {
    Emergency,
    Error,
    Info,
    Debug,
}

const fn tag(level: Level) -> &'static str {
    match level {
        Level::Emergency => "EMERG",
        Level::Error => "ERROR",
        Level::Info => "INFO",
        Level::Debug => "DEBUG",
    }
}

#[derive(Debug)]
struct Inner {
    level: Level,
    sink: LogSink,
    access: bool,
}

/// Per-instance logger handle. Cheap to clone; clones share one sink.
#[derive(Debug, Clone)]
pub struct Logger {
    inner: Arc<Inner>,
}

impl Logger {
    /// Build the logger for a mode. Only the file-backed mode can fail.
    pub fn new(mode: &LogMode) -> Result<Self, LogInitError> {
        let inner = match mode {
            LogMode::Silent => Inner {
                level: Level::Emergency,
                sink: LogSink::Stderr,
                access: false,
            },
            LogMode::Debug => Inner {
                level: Level::Debug,
                sink: LogSink::Stderr,
                access: false,
            },
            LogMode::DebugWithAccessLog(dir) => Inner {
                level: Level::Debug,
                sink: LogSink::file(&dir.join(LOG_FILE_NAME))?,
                access: true,
            },
        };

        Ok(Self {
            inner: Arc::new(inner),
        })
    }

    pub fn debug(&self, message: &str) {
        self.write(Level::Debug, message);
    }

    pub fn info(&self, message: &str) {
        self.write(Level::Info, message);
    }

    pub fn error(&self, message: &str) {
        self.write(Level::Error, message);
    }

    /// Whether per-request access lines should be produced at all.
    pub fn access_enabled(&self) -> bool {
        self.inner.access
    }

    /// Emit one pre-formatted access log line.
    pub fn access(&self, line: &str) {
        if self.inner.access {
            self.inner.sink.write_line(line);
        }
    }

    /// Flush the sink; called when an instance stops.
    pub fn flush(&self) -> std::io::Result<()> {
        self.inner.sink.flush()
    }

    fn write(&self, level: Level, message: &str) {
        if level <= self.inner.level {
            self.inner
                .sink
                .write_line(&format!("[{}] {message}", tag(level)));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn setting_maps_onto_mode() {
        assert_eq!(
            LogMode::from_setting(&LogSetting::Enabled(false)),
            LogMode::Silent
        );
        assert_eq!(
            LogMode::from_setting(&LogSetting::Enabled(true)),
            LogMode::Debug
        );
        assert_eq!(
            LogMode::from_setting(&LogSetting::Directory(PathBuf::from("logs"))),
            LogMode::DebugWithAccessLog(PathBuf::from("logs"))
        );
    }

    #[test]
    fn file_mode_truncates_and_writes() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(LOG_FILE_NAME), "stale from last run").unwrap();

        let logger =
            Logger::new(&LogMode::DebugWithAccessLog(dir.path().to_path_buf())).unwrap();
        logger.debug("mounted");
        logger.flush().unwrap();

        let contents = std::fs::read_to_string(dir.path().join(LOG_FILE_NAME)).unwrap();
        assert_eq!(contents, "[DEBUG] mounted\n");
    }

    #[test]
    fn silent_mode_suppresses_access_lines() {
        let logger = Logger::new(&LogMode::Silent).unwrap();
        assert!(!logger.access_enabled());
    }

    #[test]
    fn missing_directory_is_a_log_init_error() {
        let err = Logger::new(&LogMode::DebugWithAccessLog(PathBuf::from(
            "/definitely/not/here",
        )))
        .unwrap_err();
        assert!(err.path.ends_with(LOG_FILE_NAME));
    }
}
