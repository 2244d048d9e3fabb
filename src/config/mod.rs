//! Configuration module for the hub backend.
//!
//! All configuration is loaded from environment variables with sensible defaults.

use std::env;
use std::fmt;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

/// Which `CatalogStore` implementation backs the API.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreKind {
    /// Seeded in-memory store; resets on restart.
    Memory,
    /// SQLite file store.
    Sqlite,
}

/// Output format of the tracing subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Json,
}

/// Raised when an environment variable holds an unusable value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigError {
    pub variable: &'static str,
    pub message: String,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid {}: {}", self.variable, self.message)
    }
}

impl std::error::Error for ConfigError {}

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Address to bind the server to
    pub bind_addr: SocketAddr,
    /// Store backend
    pub store: StoreKind,
    /// Path to SQLite database file (used with `StoreKind::Sqlite`)
    pub db_path: PathBuf,
    /// Path to Tantivy search index directory; `None` keeps the index in RAM
    pub index_path: Option<PathBuf>,
    /// Artificial delay applied to upload and password flows
    pub simulated_latency: Duration,
    /// Maximum accepted multipart body size in bytes
    pub max_upload_bytes: usize,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
    /// Log output format
    pub log_format: LogFormat,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 8080)),
            store: StoreKind::Memory,
            db_path: PathBuf::from("./data/hub.sqlite"),
            index_path: None,
            simulated_latency: Duration::from_millis(1500),
            max_upload_bytes: 25 * 1024 * 1024,
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let bind_addr = match lookup("HUB_BIND_ADDR") {
            Some(raw) => raw.parse().map_err(|e| ConfigError {
                variable: "HUB_BIND_ADDR",
                message: format!("{}", e),
            })?,
            None => defaults.bind_addr,
        };

        let store = match lookup("HUB_STORE").as_deref() {
            None | Some("memory") => StoreKind::Memory,
            Some("sqlite") => StoreKind::Sqlite,
            Some(other) => {
                return Err(ConfigError {
                    variable: "HUB_STORE",
                    message: format!("expected 'memory' or 'sqlite', got '{}'", other),
                })
            }
        };

        let db_path = lookup("HUB_DB_PATH")
            .map(PathBuf::from)
            .unwrap_or(defaults.db_path);

        let index_path = lookup("HUB_INDEX_PATH")
            .filter(|p| !p.trim().is_empty())
            .map(PathBuf::from);

        let simulated_latency = match lookup("HUB_SIMULATED_LATENCY_MS") {
            Some(raw) => Duration::from_millis(raw.parse().map_err(|e| ConfigError {
                variable: "HUB_SIMULATED_LATENCY_MS",
                message: format!("{}", e),
            })?),
            None => defaults.simulated_latency,
        };

        let max_upload_bytes = match lookup("HUB_MAX_UPLOAD_BYTES") {
            Some(raw) => raw.parse().map_err(|e| ConfigError {
                variable: "HUB_MAX_UPLOAD_BYTES",
                message: format!("{}", e),
            })?,
            None => defaults.max_upload_bytes,
        };

        let log_level = lookup("HUB_LOG_LEVEL").unwrap_or(defaults.log_level);

        let log_format = match lookup("HUB_LOG_FORMAT").as_deref() {
            None | Some("pretty") => LogFormat::Pretty,
            Some("json") => LogFormat::Json,
            Some(other) => {
                return Err(ConfigError {
                    variable: "HUB_LOG_FORMAT",
                    message: format!("expected 'pretty' or 'json', got '{}'", other),
                })
            }
        };

        Ok(Self {
            bind_addr,
            store,
            db_path,
            index_path,
            simulated_latency,
            max_upload_bytes,
            log_level,
            log_format,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_default_config() {
        let config = Config::from_lookup(|_| None).unwrap();

        assert_eq!(config.bind_addr.to_string(), "127.0.0.1:8080");
        assert_eq!(config.store, StoreKind::Memory);
        assert_eq!(config.db_path, PathBuf::from("./data/hub.sqlite"));
        assert!(config.index_path.is_none());
        assert_eq!(config.simulated_latency, Duration::from_millis(1500));
        assert_eq!(config.max_upload_bytes, 26_214_400);
        assert_eq!(config.log_level, "info");
        assert_eq!(config.log_format, LogFormat::Pretty);
    }

    #[test]
    fn test_overrides() {
        let config = Config::from_lookup(lookup_from(&[
            ("HUB_BIND_ADDR", "0.0.0.0:9000"),
            ("HUB_STORE", "sqlite"),
            ("HUB_DB_PATH", "/tmp/hub.db"),
            ("HUB_INDEX_PATH", "/tmp/index"),
            ("HUB_SIMULATED_LATENCY_MS", "0"),
            ("HUB_LOG_FORMAT", "json"),
        ]))
        .unwrap();

        assert_eq!(config.bind_addr.port(), 9000);
        assert_eq!(config.store, StoreKind::Sqlite);
        assert_eq!(config.db_path, PathBuf::from("/tmp/hub.db"));
        assert_eq!(config.index_path, Some(PathBuf::from("/tmp/index")));
        assert_eq!(config.simulated_latency, Duration::ZERO);
        assert_eq!(config.log_format, LogFormat::Json);
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        let err = Config::from_lookup(lookup_from(&[("HUB_STORE", "postgres")])).unwrap_err();
        assert_eq!(err.variable, "HUB_STORE");

        let err = Config::from_lookup(lookup_from(&[("HUB_BIND_ADDR", "nowhere")])).unwrap_err();
        assert_eq!(err.variable, "HUB_BIND_ADDR");

        let err = Config::from_lookup(lookup_from(&[("HUB_SIMULATED_LATENCY_MS", "-5")]))
            .unwrap_err();
        assert_eq!(err.variable, "HUB_SIMULATED_LATENCY_MS");
    }
}
