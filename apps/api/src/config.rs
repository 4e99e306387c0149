//! # API Configuration
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     SWEETSHOP_PORT=8080                                                │
//! │     SWEETSHOP_DATABASE_PATH=/var/lib/sweetshop/sweetshop.db            │
//! │                                                                         │
//! │  2. TOML Config File                                                   │
//! │     $SWEETSHOP_CONFIG, or                                              │
//! │     ~/.config/sweetshop/sweetshop.toml (Linux)                         │
//! │     ~/Library/Application Support/com.sweetshop.sweetshop/... (macOS)  │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! │     0.0.0.0:3000, ./data/sweetshop.db, development                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! # sweetshop.toml
//! [server]
//! host = "127.0.0.1"
//! port = 3000
//! environment = "production"  # development | production | test
//! cors_origins = ["http://localhost:5173"]  # empty: any origin
//!
//! [database]
//! path = "./data/sweetshop.db"
//! max_connections = 5
//! ```

use axum::http::HeaderValue;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::{debug, info};

use sweetshop_db::DbConfig;

/// Environment variable naming an explicit config file.
pub const CONFIG_PATH_ENV: &str = "SWEETSHOP_CONFIG";

// =============================================================================
// Environment
// =============================================================================

/// Deployment environment, reported by `/health`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Production,
    Test,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Production => write!(f, "production"),
            Environment::Test => write!(f, "test"),
        }
    }
}

impl std::str::FromStr for Environment {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "development" | "dev" => Ok(Environment::Development),
            "production" | "prod" => Ok(Environment::Production),
            "test" => Ok(Environment::Test),
            other => Err(ConfigError::InvalidValue {
                key: "environment".to_string(),
                message: format!(
                    "unknown environment '{}'; expected development, production or test",
                    other
                ),
            }),
        }
    }
}

// =============================================================================
// Server Settings
// =============================================================================

/// Where and how the HTTP server listens.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default)]
    pub environment: Environment,

    /// Origins allowed by CORS. Empty allows any origin.
    #[serde(default)]
    pub cors_origins: Vec<String>,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3000
}

impl Default for ServerSettings {
    fn default() -> Self {
        ServerSettings {
            host: default_host(),
            port: default_port(),
            environment: Environment::default(),
            cors_origins: Vec::new(),
        }
    }
}

impl ServerSettings {
    /// Returns `host:port`.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

// =============================================================================
// Database Settings
// =============================================================================

/// SQLite file and pool size.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseSettings {
    #[serde(default = "default_database_path")]
    pub path: PathBuf,

    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

fn default_database_path() -> PathBuf {
    PathBuf::from("./data/sweetshop.db")
}

fn default_max_connections() -> u32 {
    5
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        DatabaseSettings {
            path: default_database_path(),
            max_connections: default_max_connections(),
        }
    }
}

// =============================================================================
// API Configuration
// =============================================================================

/// Complete server configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ApiConfig {
    #[serde(default)]
    pub server: ServerSettings,

    #[serde(default)]
    pub database: DatabaseSettings,
}

impl ApiConfig {
    /// Loads configuration: defaults, then the TOML file, then environment
    /// overrides, then validation.
    ///
    /// A file named by `SWEETSHOP_CONFIG` must exist; the platform default
    /// location is optional.
    pub fn load() -> Result<Self, ConfigError> {
        let explicit = std::env::var(CONFIG_PATH_ENV).ok().map(PathBuf::from);
        let mut config = match explicit {
            Some(path) => Self::from_file(&path)?,
            None => match Self::default_config_path() {
                Some(path) if path.exists() => Self::from_file(&path)?,
                Some(path) => {
                    debug!(?path, "Config file not found, using defaults");
                    Self::default()
                }
                None => Self::default(),
            },
        };

        config.apply_env_overrides(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Parses a TOML file.
    pub fn from_file(path: &std::path::Path) -> Result<Self, ConfigError> {
        info!(?path, "Loading config from file");
        let contents = std::fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        Ok(toml::from_str(&contents)?)
    }

    /// Applies `SWEETSHOP_*` overrides read through `lookup`.
    ///
    /// Takes the lookup as a function so tests can supply variables without
    /// touching the process environment.
    pub fn apply_env_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(host) = lookup("SWEETSHOP_HOST") {
            self.server.host = host;
        }

        if let Some(port) = lookup("SWEETSHOP_PORT") {
            self.server.port = parse_env("SWEETSHOP_PORT", &port)?;
            debug!(port = self.server.port, "Overriding port from environment");
        }

        if let Some(environment) = lookup("SWEETSHOP_ENVIRONMENT") {
            self.server.environment = environment.parse()?;
        }

        if let Some(origins) = lookup("SWEETSHOP_CORS_ORIGINS") {
            self.server.cors_origins = origins
                .split(',')
                .map(str::trim)
                .filter(|origin| !origin.is_empty())
                .map(str::to_string)
                .collect();
        }

        if let Some(path) = lookup("SWEETSHOP_DATABASE_PATH") {
            self.database.path = PathBuf::from(path);
        }

        if let Some(max) = lookup("SWEETSHOP_MAX_CONNECTIONS") {
            self.database.max_connections = parse_env("SWEETSHOP_MAX_CONNECTIONS", &max)?;
        }

        Ok(())
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.host.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                key: "server.host".to_string(),
                message: "must not be empty".to_string(),
            });
        }

        if self.server.port == 0 {
            return Err(ConfigError::InvalidValue {
                key: "server.port".to_string(),
                message: "must be between 1 and 65535".to_string(),
            });
        }

        for origin in &self.server.cors_origins {
            if origin.trim().is_empty() || HeaderValue::from_str(origin).is_err() {
                return Err(ConfigError::InvalidValue {
                    key: "server.cors_origins".to_string(),
                    message: format!("'{}' is not a valid origin", origin),
                });
            }
        }

        if self.database.path.as_os_str().is_empty() {
            return Err(ConfigError::InvalidValue {
                key: "database.path".to_string(),
                message: "must not be empty".to_string(),
            });
        }

        if self.database.max_connections == 0 {
            return Err(ConfigError::InvalidValue {
                key: "database.max_connections".to_string(),
                message: "must be greater than 0".to_string(),
            });
        }

        Ok(())
    }

    /// Pool configuration for this server.
    pub fn db_config(&self) -> DbConfig {
        DbConfig::new(&self.database.path).max_connections(self.database.max_connections)
    }

    /// Returns the platform-specific default config path.
    pub fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "sweetshop", "sweetshop")
            .map(|dirs| dirs.config_dir().join("sweetshop.toml"))
    }
}

fn parse_env<T: std::str::FromStr>(key: &str, value: &str) -> Result<T, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::InvalidValue {
        key: key.to_string(),
        message: format!("cannot parse '{}'", value),
    })
}

// =============================================================================
// Errors
// =============================================================================

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {key}: {message}")]
    InvalidValue { key: String, message: String },

    #[error("Cannot read config file {path:?}: {message}")]
    Read { path: PathBuf, message: String },

    #[error("Invalid config file: {0}")]
    Parse(#[from] toml::de::Error),
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = ApiConfig::default();
        assert_eq!(config.server.bind_address(), "0.0.0.0:3000");
        assert_eq!(config.server.environment, Environment::Development);
        assert_eq!(config.database.path, PathBuf::from("./data/sweetshop.db"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config: ApiConfig = toml::from_str(
            r#"
            [server]
            port = 8080
            environment = "production"
            "#,
        )
        .unwrap();

        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.environment, Environment::Production);
        assert_eq!(config.database.max_connections, 5);
    }

    #[test]
    fn test_env_overrides_file_values() {
        let mut config: ApiConfig = toml::from_str("[server]\nport = 8080\n").unwrap();
        config
            .apply_env_overrides(env(&[
                ("SWEETSHOP_PORT", "9090"),
                ("SWEETSHOP_HOST", "127.0.0.1"),
                ("SWEETSHOP_ENVIRONMENT", "test"),
                ("SWEETSHOP_DATABASE_PATH", "/tmp/shop.db"),
                ("SWEETSHOP_MAX_CONNECTIONS", "2"),
                ("SWEETSHOP_CORS_ORIGINS", "http://localhost:5173, https://shop.example,"),
            ]))
            .unwrap();

        assert_eq!(
            config.server.cors_origins,
            ["http://localhost:5173", "https://shop.example"]
        );

        assert_eq!(config.server.bind_address(), "127.0.0.1:9090");
        assert_eq!(config.server.environment, Environment::Test);
        assert_eq!(config.database.path, PathBuf::from("/tmp/shop.db"));
        assert_eq!(config.db_config().max_connections, 2);
    }

    #[test]
    fn test_invalid_env_value_is_an_error() {
        let mut config = ApiConfig::default();
        let err = config
            .apply_env_overrides(env(&[("SWEETSHOP_PORT", "not-a-port")]))
            .unwrap_err();
        assert!(err.to_string().contains("SWEETSHOP_PORT"));

        let err = config
            .apply_env_overrides(env(&[("SWEETSHOP_ENVIRONMENT", "staging")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { .. }));
    }

    #[test]
    fn test_validate_rejects_zero_values() {
        let mut config = ApiConfig::default();
        config.server.port = 0;
        assert!(config.validate().is_err());

        let mut config = ApiConfig::default();
        config.database.max_connections = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_bad_cors_origin() {
        let mut config: ApiConfig =
            toml::from_str("[server]\ncors_origins = [\"http://localhost:5173\"]\n").unwrap();
        assert!(config.validate().is_ok());

        config.server.cors_origins.push("http://bad\norigin".to_string());
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("server.cors_origins"));
    }

    #[test]
    fn test_bad_toml_is_parse_error() {
        let result: Result<ApiConfig, _> = toml::from_str("[server]\nport = \"high\"\n");
        let err: ConfigError = result.unwrap_err().into();
        assert!(matches!(err, ConfigError::Parse(_)));
    }
}
