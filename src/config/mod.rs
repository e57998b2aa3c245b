// Configuration module entry point
// Parsing, validation, and resolution of startup parameters.

mod types;

use crate::error::ConfigError;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

// Re-export public types
pub use types::{FolderMount, LogSetting, ServerConfig};

/// A mount resolved to an absolute source directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mount {
    /// Absolute directory the files come from.
    pub source: PathBuf,
    /// Normalized URL prefix: leading slash, no trailing slash.
    pub prefix: String,
}

/// The validated, resolved view of a [`ServerConfig`] the request path
/// works with.
#[derive(Debug, Clone)]
pub struct Site {
    pub mounts: Vec<Mount>,
    pub fallback: Option<PathBuf>,
}

impl ServerConfig {
    /// Load configuration from a file (TOML, extension optional) layered
    /// with `STATIC_SERVER_*` environment overrides.
    pub fn load_from(config_path: &str) -> Result<Self, ConfigError> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(config_path).required(false))
            .add_source(config::Environment::with_prefix("STATIC_SERVER"))
            .set_default("host", "0.0.0.0")?
            .set_default("port", 4567)?
            .set_default("fallback", false)?
            .set_default("fallback_file", "index.html")?
            .set_default("log_format", "tiny")?
            .build()?;

        Ok(settings.try_deserialize()?)
    }

    /// Parse configuration from an inline TOML document.
    pub fn from_toml_str(input: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(input)?)
    }

    /// Check folder descriptors, before any side effect happens.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for folder in &self.folders {
            if folder.path.as_os_str().is_empty() {
                return Err(ConfigError::EmptyFolderPath);
            }
            if folder.mount.is_empty() {
                return Err(ConfigError::EmptyMountPrefix);
            }
        }
        Ok(())
    }

    /// The socket address `start` binds. `start` reports a parse failure
    /// as a bind-time error, alongside the other socket failures.
    pub fn socket_addr(&self) -> Result<SocketAddr, std::net::AddrParseError> {
        format!("{}:{}", self.host, self.port).parse()
    }

    /// Resolve folders and the fallback document to absolute paths.
    ///
    /// Assumes [`validate`](Self::validate) already passed; resolution
    /// itself cannot fail. Directories are not required to exist yet; a
    /// missing source answers 404 per request instead of failing the start.
    pub fn resolve(&self) -> Site {
        let mounts = self
            .folders
            .iter()
            .map(|folder| Mount {
                source: absolute(&folder.path),
                prefix: normalize_mount(&folder.mount),
            })
            .collect();
        let fallback = self.fallback.then(|| absolute(&self.fallback_file));

        Site { mounts, fallback }
    }
}

/// Make a path absolute against the current directory without touching the
/// filesystem.
fn absolute(path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir().map_or_else(|_| path.to_path_buf(), |cwd| cwd.join(path))
    }
}

/// Normalize a mount prefix: ensure the leading slash, drop trailing ones.
fn normalize_mount(mount: &str) -> String {
    if mount == "/" {
        return "/".to_string();
    }

    let trimmed = mount.trim_end_matches('/');
    if trimmed.starts_with('/') {
        trimmed.to_string()
    } else {
        format!("/{trimmed}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_documented_table() {
        let cfg = ServerConfig::default();
        assert!(cfg.folders.is_empty());
        assert_eq!(cfg.logging, LogSetting::Enabled(false));
        assert_eq!(cfg.host, "0.0.0.0");
        assert_eq!(cfg.port, 4567);
        assert!(!cfg.fallback);
        assert_eq!(cfg.fallback_file, PathBuf::from("index.html"));
        assert_eq!(cfg.log_format, "tiny");
    }

    #[test]
    fn folders_accept_a_single_descriptor() {
        let cfg = ServerConfig::from_toml_str(
            r#"folders = { path = "./public", mount = "/" }"#,
        )
        .unwrap();
        assert_eq!(cfg.folders.len(), 1);
        assert_eq!(cfg.folders[0].path, PathBuf::from("./public"));
        assert_eq!(cfg.folders[0].mount, "/");
    }

    #[test]
    fn folders_accept_an_ordered_sequence() {
        let cfg = ServerConfig::from_toml_str(
            r#"
            [[folders]]
            path = "./app"
            mount = "/app"

            [[folders]]
            path = "./assets"
            mount = "/assets"
            "#,
        )
        .unwrap();
        assert_eq!(cfg.folders.len(), 2);
        assert_eq!(cfg.folders[0].mount, "/app");
        assert_eq!(cfg.folders[1].mount, "/assets");
    }

    #[test]
    fn logging_accepts_bool_or_directory() {
        let on = ServerConfig::from_toml_str("logging = true").unwrap();
        assert_eq!(on.logging, LogSetting::Enabled(true));

        let dir = ServerConfig::from_toml_str(r#"logging = "logs""#).unwrap();
        assert_eq!(dir.logging, LogSetting::Directory(PathBuf::from("logs")));
    }

    #[test]
    fn folder_without_mount_is_rejected() {
        let err = ServerConfig::from_toml_str(r#"folders = { path = "./public" }"#);
        assert!(err.is_err());
    }

    #[test]
    fn empty_mount_fails_validation() {
        let cfg = ServerConfig {
            folders: vec![FolderMount {
                path: PathBuf::from("./public"),
                mount: String::new(),
            }],
            ..ServerConfig::default()
        };
        assert!(matches!(
            cfg.validate(),
            Err(ConfigError::EmptyMountPrefix)
        ));
    }

    #[test]
    fn empty_path_fails_validation() {
        let cfg = ServerConfig {
            folders: vec![FolderMount {
                path: PathBuf::new(),
                mount: "/".to_string(),
            }],
            ..ServerConfig::default()
        };
        assert!(matches!(cfg.validate(), Err(ConfigError::EmptyFolderPath)));
    }

    #[test]
    fn mount_prefixes_are_normalized() {
        assert_eq!(normalize_mount("/"), "/");
        assert_eq!(normalize_mount("app"), "/app");
        assert_eq!(normalize_mount("/app/"), "/app");
        assert_eq!(normalize_mount("app//"), "/app");
    }

    #[test]
    fn unparseable_host_fails_address_parsing() {
        let cfg = ServerConfig {
            host: "not-an-ip".to_string(),
            ..ServerConfig::default()
        };
        assert!(cfg.socket_addr().is_err());
    }
}
