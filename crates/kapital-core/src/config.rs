//! Application configuration
//!
//! Read from TOML. Lookup order: an explicit path, then
//! `<config dir>/kapital/config.toml`, then built-in defaults. Every key is
//! optional; missing ones keep their default.
//!
//! ```toml
//! [server]
//! host = "0.0.0.0"
//! port = 8080
//! static_dir = "ui/dist"
//! allowed_origins = ["http://localhost:5173"]
//!
//! [database]
//! path = "/var/lib/kapital/kapital.db"
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::debug;

use crate::error::{Error, Result};

pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_DB_PATH: &str = "kapital.db";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    pub static_dir: Option<PathBuf>,
    /// Empty means same-origin only
    pub allowed_origins: Vec<String>,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            static_dir: None,
            allowed_origins: vec![],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabaseSettings {
    pub path: PathBuf,
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        Self {
            path: PathBuf::from(DEFAULT_DB_PATH),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AppConfig {
    pub server: ServerSettings,
    pub database: DatabaseSettings,
}

/// Default config location
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("kapital").join("config.toml"))
}

impl AppConfig {
    /// Load configuration (explicit path first, then default location).
    ///
    /// An explicit path that doesn't exist is an error; a missing default
    /// file just means defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        if let Some(path) = path {
            return Self::from_file(path);
        }

        match default_config_path() {
            Some(default_path) if default_path.exists() => Self::from_file(&default_path),
            _ => Ok(Self::default()),
        }
    }

    fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            Error::Config(format!("Failed to read {}: {}", path.display(), e))
        })?;
        debug!(path = %path.display(), "Loaded config file");
        Self::parse(&content)
    }

    /// Parse config from TOML content
    pub fn parse(content: &str) -> Result<Self> {
        let raw: RawConfig = toml::from_str(content)
            .map_err(|e| Error::Config(format!("Invalid config TOML: {}", e)))?;

        let mut config = Self::default();

        if let Some(server) = raw.server {
            if let Some(host) = server.host {
                config.server.host = host;
            }
            if let Some(port) = server.port {
                config.server.port = port;
            }
            if let Some(dir) = server.static_dir {
                config.server.static_dir = Some(dir);
            }
            if let Some(origins) = server.allowed_origins {
                config.server.allowed_origins = origins;
            }
        }

        if let Some(path) = raw.database.and_then(|d| d.path) {
            config.database.path = path;
        }

        Ok(config)
    }
}

/// Raw config structure for TOML parsing
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawConfig {
    server: Option<RawServer>,
    database: Option<RawDatabase>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawServer {
    host: Option<String>,
    port: Option<u16>,
    static_dir: Option<PathBuf>,
    allowed_origins: Option<Vec<String>>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawDatabase {
    path: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_empty_config_is_default() {
        assert_eq!(AppConfig::parse("").unwrap(), AppConfig::default());
    }

    #[test]
    fn test_parse_full_config() {
        let config = AppConfig::parse(
            r#"
            [server]
            host = "0.0.0.0"
            port = 8080
            static_dir = "ui/dist"
            allowed_origins = ["http://localhost:5173"]

            [database]
            path = "/var/lib/kapital/kapital.db"
            "#,
        )
        .unwrap();

        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.static_dir, Some(PathBuf::from("ui/dist")));
        assert_eq!(config.server.allowed_origins, vec!["http://localhost:5173"]);
        assert_eq!(
            config.database.path,
            PathBuf::from("/var/lib/kapital/kapital.db")
        );
    }

    #[test]
    fn test_partial_config_keeps_defaults() {
        let config = AppConfig::parse("[server]\nport = 4000\n").unwrap();
        assert_eq!(config.server.port, 4000);
        assert_eq!(config.server.host, DEFAULT_HOST);
        assert_eq!(config.database.path, PathBuf::from(DEFAULT_DB_PATH));
    }

    #[test]
    fn test_invalid_config_rejected() {
        assert!(matches!(
            AppConfig::parse("[server]\nport = \"eighty\"\n"),
            Err(Error::Config(_))
        ));
        assert!(matches!(
            AppConfig::parse("[server]\nprot = 80\n"),
            Err(Error::Config(_))
        ));
    }

    #[test]
    fn test_load_from_explicit_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[database]\npath = \"ledger.db\"").unwrap();

        let config = AppConfig::load(Some(file.path())).unwrap();
        assert_eq!(config.database.path, PathBuf::from("ledger.db"));
    }

    #[test]
    fn test_missing_explicit_path_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.toml");
        assert!(matches!(
            AppConfig::load(Some(&missing)),
            Err(Error::Config(_))
        ));
    }
}
