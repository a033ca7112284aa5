//! Configuration management for the issue tracker.
//!
//! Configuration is read from a YAML file (see `config.yaml`) and can then be
//! overridden via environment variables:
//! - `HOST` - Optional. Server host. Defaults to `127.0.0.1`.
//! - `PORT` - Optional. Server port. Defaults to `8080`.
//! - `STORE_BACKEND` - Optional. `sqlite` or `memory`. Defaults to `sqlite`.
//! - `DATABASE_PATH` - Optional. SQLite file path. Defaults to `data/issues.db`.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use crate::repository::StoreBackend;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_yaml::Error,
    },

    #[error("Invalid value for {0}: {1}")]
    InvalidValue(String, String),
}

/// HTTP listener configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SqliteConfig {
    /// Database file, created on first start.
    pub path: PathBuf,
}

impl Default for SqliteConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("data/issues.db"),
        }
    }
}

/// Storage configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Backend name as written in the file (`sqlite` or `memory`).
    pub backend: Option<String>,
    pub sqlite: SqliteConfig,
}

/// Service configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub storage: StorageConfig,
}

impl Config {
    /// Load configuration from `path`, then apply environment overrides.
    ///
    /// A missing file yields the defaults; an unreadable or malformed one is
    /// an error.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let mut config = if path.exists() {
            let config = Self::from_file(path)?;
            tracing::info!("Loaded configuration from {}", path.display());
            config
        } else {
            tracing::info!(
                "No config file found at {}, using defaults",
                path.display()
            );
            Self::default()
        };

        config.apply_overrides(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Parse a YAML config file without applying overrides.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn from_yaml(contents: &str) -> Result<Self, serde_yaml::Error> {
        // An empty document deserializes as unit, not as an empty mapping.
        if contents.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(contents)
    }

    /// Apply overrides from `lookup` (normally the process environment).
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(host) = lookup("HOST") {
            self.server.host = host;
        }

        if let Some(port) = lookup("PORT") {
            self.server.port = port
                .parse()
                .map_err(|e| ConfigError::InvalidValue("PORT".to_string(), format!("{}", e)))?;
        }

        if let Some(backend) = lookup("STORE_BACKEND") {
            self.storage.backend = Some(backend);
        }

        if let Some(db_path) = lookup("DATABASE_PATH") {
            self.storage.sqlite.path = PathBuf::from(db_path);
        }

        Ok(())
    }

    /// Reject values that would only fail later at startup.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.store_backend().map(|_| ())
    }

    /// Selected storage backend.
    pub fn store_backend(&self) -> Result<StoreBackend, ConfigError> {
        match self.storage.backend.as_deref() {
            None => Ok(StoreBackend::default()),
            Some(name) => StoreBackend::parse(name).ok_or_else(|| {
                ConfigError::InvalidValue("storage.backend".to_string(), name.to_string())
            }),
        }
    }

    /// Socket address string for the listener.
    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}
