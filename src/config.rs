//! Server configuration.
//!
//! Values are layered: built-in defaults, then an optional TOML file, then
//! `CACHE_HUNT_*` environment variables, then command-line flags.

use std::path::Path;

use derive_getters::Getters;
use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

use crate::app::PageLimits;

/// Environment variable naming the database file.
pub const DB_ENV: &str = "CACHE_HUNT_DB";
/// Environment variable naming the bind host.
pub const HOST_ENV: &str = "CACHE_HUNT_HOST";
/// Environment variable naming the bind port.
pub const PORT_ENV: &str = "CACHE_HUNT_PORT";

/// Settings for the HTTP server and its database.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address to bind.
    host: String,
    /// Port to bind.
    port: u16,
    /// SQLite database file, created if missing.
    db_path: String,
    /// Games per page when the caller gives no limit.
    default_page_size: i64,
    /// Largest page a caller may request.
    max_page_size: i64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3000,
            db_path: "cache_hunt.db".to_string(),
            default_page_size: crate::app::DEFAULT_PAGE_SIZE,
            max_page_size: crate::app::MAX_PAGE_SIZE,
        }
    }
}

impl ServerConfig {
    /// Loads configuration from a TOML file. Missing keys take defaults.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        debug!("Loading config from file");
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::new(format!("Failed to read config file: {}", e)))?;
        let config = Self::from_toml(&content)?;
        info!(host = %config.host, port = config.port, "Config loaded successfully");
        Ok(config)
    }

    /// Parses configuration from TOML text.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)
            .map_err(|e| ConfigError::new(format!("Failed to parse config: {}", e)))?;
        config.validate()
    }

    /// Applies `CACHE_HUNT_*` overrides read through `lookup`.
    ///
    /// Pass `|key| std::env::var(key).ok()` to read the process environment.
    #[instrument(skip(self, lookup))]
    pub fn with_env(
        mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        if let Some(db_path) = lookup(DB_ENV) {
            debug!(db_path = %db_path, "Database path from environment");
            self.db_path = db_path;
        }
        if let Some(host) = lookup(HOST_ENV) {
            self.host = host;
        }
        if let Some(port) = lookup(PORT_ENV) {
            self.port = port
                .parse()
                .map_err(|_| ConfigError::new(format!("{} is not a port: '{}'", PORT_ENV, port)))?;
        }
        self.validate()
    }

    /// Applies command-line overrides; `None` keeps the current value.
    pub fn with_overrides(
        mut self,
        host: Option<String>,
        port: Option<u16>,
        db_path: Option<String>,
    ) -> Result<Self, ConfigError> {
        if let Some(host) = host {
            self.host = host;
        }
        if let Some(port) = port {
            self.port = port;
        }
        if let Some(db_path) = db_path {
            self.db_path = db_path;
        }
        self.validate()
    }

    /// Page limits for list queries.
    pub fn page_limits(&self) -> PageLimits {
        PageLimits::new(self.default_page_size, self.max_page_size)
    }

    fn validate(self) -> Result<Self, ConfigError> {
        if self.db_path.is_empty() {
            return Err(ConfigError::new("Database path is empty".to_string()));
        }
        if self.host.is_empty() {
            return Err(ConfigError::new("Host is empty".to_string()));
        }
        if self.max_page_size < 1 {
            return Err(ConfigError::new(format!(
                "max_page_size must be positive, got {}",
                self.max_page_size
            )));
        }
        Ok(self)
    }
}

/// Configuration error.
#[derive(Debug, Clone, Display, Error)]
#[display("Config error: {} at {}:{}", message, file, line)]
pub struct ConfigError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl ConfigError {
    /// Creates a new configuration error.
    #[track_caller]
    #[instrument(skip(message))]
    pub fn new(message: String) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message,
            line: loc.line(),
            file: loc.file(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_file_keeps_defaults() {
        let config = ServerConfig::from_toml("port = 8080\n").expect("parse");
        assert_eq!(*config.port(), 8080);
        assert_eq!(config.host(), "127.0.0.1");
        assert_eq!(*config.page_limits().default_size(), 10);
    }

    #[test]
    fn test_env_then_flags_override() {
        let config = ServerConfig::default()
            .with_env(|key| match key {
                DB_ENV => Some("env.db".to_string()),
                PORT_ENV => Some("4000".to_string()),
                _ => None,
            })
            .expect("env")
            .with_overrides(None, Some(5000), None)
            .expect("flags");
        assert_eq!(config.db_path(), "env.db");
        assert_eq!(*config.port(), 5000);
    }

    #[test]
    fn test_bad_port_is_rejected() {
        let result = ServerConfig::default().with_env(|key| {
            (key == PORT_ENV).then(|| "not-a-port".to_string())
        });
        assert!(result.is_err());
    }

    #[test]
    fn test_empty_db_path_is_rejected() {
        assert!(ServerConfig::from_toml("db_path = \"\"\n").is_err());
    }
}
