//! Static file server launcher for browser test harnesses.
//!
//! Binds an HTTP listener that serves build artifacts from one or more
//! mounted directories, with optional request logging and single-page-app
//! fallback routing. Servers are started programmatically by the harness
//! lifecycle and torn down with [`ServerInstance::stop`].
//!
//! ```no_run
//! use testserve::{start, FolderMount, ServerConfig};
//!
//! # async fn run() -> Result<(), testserve::StartError> {
//! let config = ServerConfig {
//!     folders: vec![FolderMount {
//!         path: "./dist".into(),
//!         mount: "/".to_string(),
//!     }],
//!     port: 0,
//!     ..ServerConfig::default()
//! };
//! let mut server = start(config).await?;
//! // drive the browser against server.local_addr() ...
//! server.stop().await.ok();
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod handler;
pub mod http;
pub mod logger;
pub mod server;

pub use config::{FolderMount, LogSetting, Mount, ServerConfig, Site};
pub use error::{ConfigError, LogInitError, StartError, StopError};
pub use logger::{AccessLogEntry, LogMode, Logger};
pub use server::{start, ServerInstance};
