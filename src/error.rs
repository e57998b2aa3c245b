//! Error types for configuration, startup, and shutdown.
//!
//! Configuration and startup failures abort `start` and reach the caller;
//! per-request I/O failures never do, they become HTTP status codes.

use std::io;
use std::net::SocketAddr;
use std::path::PathBuf;
use thiserror::Error;

/// Configuration problems detected before any socket is bound.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A folder descriptor was given without a source directory.
    #[error("folder descriptor has an empty source path")]
    EmptyFolderPath,
    /// A folder descriptor was given without a mount prefix.
    #[error("folder descriptor has an empty mount prefix")]
    EmptyMountPrefix,
    /// Loading from a config file or the environment failed.
    #[error("failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),
    /// Inline TOML did not describe a valid configuration.
    #[error("failed to parse configuration: {0}")]
    Parse(#[from] toml::de::Error),
}

/// The access log file could not be created or opened.
#[derive(Debug, Error)]
#[error("failed to open log file {}: {source}", path.display())]
pub struct LogInitError {
    pub path: PathBuf,
    #[source]
    pub source: io::Error,
}

/// Failures surfaced by [`start`](crate::server::start).
#[derive(Debug, Error)]
pub enum StartError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    LogInit(#[from] LogInitError),
    /// `host:port` does not form a bindable socket address.
    #[error("invalid bind address {addr}: {reason}")]
    InvalidAddress { addr: String, reason: String },
    /// Binding or listening on the configured address failed. Not retried;
    /// retry policy belongs to the caller.
    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: io::Error,
    },
}

/// Failures surfaced by [`ServerInstance::stop`](crate::server::ServerInstance::stop).
#[derive(Debug, Error)]
pub enum StopError {
    /// Flushing the log sink during shutdown failed.
    #[error("failed to flush log sink: {0}")]
    LogFlush(#[from] io::Error),
}
