// Configuration types module
// Startup parameters as the host harness hands them over.

use serde::{Deserialize, Deserializer, Serialize};
use std::path::PathBuf;

/// One directory to expose and the URL path prefix it is exposed under.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct FolderMount {
    /// Filesystem directory the files come from.
    pub path: PathBuf,
    /// URL path prefix the directory is mounted at.
    pub mount: String,
}

/// The `logging` option: a plain switch or a directory for the log file.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
#[serde(untagged)]
pub enum LogSetting {
    /// `true` enables debug logging to stderr; `false` is silent.
    Enabled(bool),
    /// Directory that receives `static-server.txt` with debug and access
    /// lines.
    Directory(PathBuf),
}

impl Default for LogSetting {
    fn default() -> Self {
        Self::Enabled(false)
    }
}

/// Startup parameters for one static server.
///
/// Every field has a default, so filling in `folders` on top of
/// `ServerConfig::default()` is the usual construction path.
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    /// Directories to serve, in precedence order. Deserializes from a
    /// single descriptor or an ordered sequence of them.
    #[serde(default, deserialize_with = "folders_one_or_many")]
    pub folders: Vec<FolderMount>,
    /// Request/debug logging switch or log file directory.
    #[serde(default)]
    pub logging: LogSetting,
    /// Bind address.
    #[serde(default = "default_host")]
    pub host: String,
    /// Bind port. `0` picks an ephemeral port.
    #[serde(default = "default_port")]
    pub port: u16,
    /// Serve the fallback document instead of answering 404.
    #[serde(default)]
    pub fallback: bool,
    /// Document served on unmatched requests when `fallback` is on.
    #[serde(default = "default_fallback_file")]
    pub fallback_file: PathBuf,
    /// Access log line format: `tiny`, `common`, `json`, or a custom
    /// `$variable` pattern.
    #[serde(default = "default_log_format")]
    pub log_format: String,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

const fn default_port() -> u16 {
    4567
}

fn default_fallback_file() -> PathBuf {
    PathBuf::from("index.html")
}

fn default_log_format() -> String {
    "tiny".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            folders: Vec::new(),
            logging: LogSetting::default(),
            host: default_host(),
            port: default_port(),
            fallback: false,
            fallback_file: default_fallback_file(),
            log_format: default_log_format(),
        }
    }
}

/// `folders` accepts either one descriptor or an ordered list of them.
fn folders_one_or_many<'de, D>(deserializer: D) -> Result<Vec<FolderMount>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OneOrMany {
        One(FolderMount),
        Many(Vec<FolderMount>),
    }

    Ok(match OneOrMany::deserialize(deserializer)? {
        OneOrMany::One(folder) => vec![folder],
        OneOrMany::Many(folders) => folders,
    })
}
