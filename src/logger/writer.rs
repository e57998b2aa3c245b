// Log sink module
// Chooses where log lines go and serializes writes to the file target.

use crate::error::LogInitError;
use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::Path;
use std::sync::Mutex;

/// Where log lines end up.
#[derive(Debug)]
pub enum LogSink {
    /// Diagnostic output for the plain `true` logging setting.
    Stderr,
    /// The log file under the configured directory.
    File(Mutex<File>),
}

impl LogSink {
    /// Truncate-create the log file at `path` and target it.
    pub fn file(path: &Path) -> Result<Self, LogInitError> {
        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(path)
            .map_err(|source| LogInitError {
                path: path.to_path_buf(),
                source,
            })?;
        Ok(Self::File(Mutex::new(file)))
    }

    /// Append one line. Write failures are ignored; a full disk must not
    /// take the server down.
    pub fn write_line(&self, message: &str) {
        match self {
            Self::Stderr => eprintln!("{message}"),
            Self::File(file) => {
                if let Ok(mut f) = file.lock() {
                    let _ = writeln!(f, "{message}");
                }
            }
        }
    }

    /// Flush the target, called when an instance stops.
    pub fn flush(&self) -> io::Result<()> {
        match self {
            Self::Stderr => io::stderr().flush(),
            Self::File(file) => match file.lock() {
                Ok(mut f) => f.flush(),
                Err(_) => Ok(()),
            },
        }
    }
}
