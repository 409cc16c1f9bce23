//! Configuration loading for the registry service
//!
//! A JSON file provides the base configuration; every field has a default so
//! an empty object is valid. Selected environment variables override the
//! file afterwards:
//! - `HOST`, `PORT`
//! - `DATABASE_URL` (also selects the postgres backend)
//! - `COINGECKO_BASE_URL`, `COINGECKO_API_KEY`
//! - `REFRESH_INTERVAL_SECS`

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Longest accepted reconciliation interval (one year)
pub const MAX_RECONCILIATION_INTERVAL_SECS: u64 = 365 * 24 * 60 * 60;

/// Longest accepted provider request timeout
pub const MAX_PROVIDER_TIMEOUT_SECS: u64 = 300;

/// Root configuration for the registry service
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RegistryConfig {
    #[serde(default)]
    pub server: ServerConfig,

    /// Price provider connection
    #[serde(default)]
    pub provider: ProviderConfig,

    /// Background market data refresh
    #[serde(default)]
    pub reconciliation: ReconciliationConfig,

    #[serde(default)]
    pub storage: StorageConfig,
}

impl RegistryConfig {
    /// Load configuration from a JSON file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(|e| ConfigError::Io {
            path: path.as_ref().display().to_string(),
            error: e.to_string(),
        })?;

        Self::from_json(&content)
    }

    /// Parse configuration from JSON string
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(json).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Apply overrides from the process environment
    pub fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        self.apply_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides from an arbitrary variable lookup
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(host) = lookup("HOST") {
            self.server.host = host;
        }
        if let Some(port) = lookup("PORT") {
            self.server.port = parse_var("PORT", &port)?;
        }
        if let Some(url) = lookup("DATABASE_URL") {
            self.storage.backend = StorageBackend::Postgres;
            self.storage.database_url = Some(url);
        }
        if let Some(url) = lookup("COINGECKO_BASE_URL") {
            self.provider.base_url = url;
        }
        if let Some(key) = lookup("COINGECKO_API_KEY") {
            self.provider.api_key = Some(key).filter(|k| !k.is_empty());
        }
        if let Some(secs) = lookup("REFRESH_INTERVAL_SECS") {
            self.reconciliation.interval_secs = parse_var("REFRESH_INTERVAL_SECS", &secs)?;
        }
        Ok(())
    }

    /// Check cross-field constraints
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.provider.base_url.trim().is_empty() {
            return Err(ConfigError::Invalid("provider.base_url is empty".into()));
        }
        if !(1..=MAX_PROVIDER_TIMEOUT_SECS).contains(&self.provider.timeout_secs) {
            return Err(ConfigError::Invalid(format!(
                "provider.timeout_secs must be between 1 and {}",
                MAX_PROVIDER_TIMEOUT_SECS
            )));
        }
        if !(1..=MAX_RECONCILIATION_INTERVAL_SECS).contains(&self.reconciliation.interval_secs) {
            return Err(ConfigError::Invalid(format!(
                "reconciliation.interval_secs must be between 1 and {}",
                MAX_RECONCILIATION_INTERVAL_SECS
            )));
        }
        if self.storage.backend == StorageBackend::Postgres {
            if self.storage.database_url.is_none() {
                return Err(ConfigError::Invalid(
                    "storage.database_url is required for the postgres backend".into(),
                ));
            }
            if self.storage.max_connections == 0 {
                return Err(ConfigError::Invalid(
                    "storage.max_connections must be positive".into(),
                ));
            }
        }
        Ok(())
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

fn parse_var<T: std::str::FromStr>(key: &str, value: &str) -> Result<T, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::Env {
        key: key.to_string(),
        value: value.to_string(),
    })
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8000
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

/// CoinGecko API configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Sent as `x-cg-demo-api-key` when present
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_base_url() -> String {
    "https://api.coingecko.com/api/v3".to_string()
}

fn default_timeout_secs() -> u64 {
    10
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            api_key: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl ProviderConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Background reconciliation schedule
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReconciliationConfig {
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    #[serde(default = "default_interval_secs")]
    pub interval_secs: u64,
    /// Run once immediately instead of waiting a full interval
    #[serde(default)]
    pub run_on_startup: bool,
}

fn default_enabled() -> bool {
    true
}

fn default_interval_secs() -> u64 {
    24 * 60 * 60
}

impl Default for ReconciliationConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            interval_secs: default_interval_secs(),
            run_on_startup: false,
        }
    }
}

impl ReconciliationConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StorageBackend {
    InMemory,
    Postgres,
}

/// Record store configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    #[serde(default = "default_backend")]
    pub backend: StorageBackend,
    #[serde(default)]
    pub database_url: Option<String>,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

fn default_backend() -> StorageBackend {
    StorageBackend::InMemory
}

fn default_max_connections() -> u32 {
    5
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: default_backend(),
            database_url: None,
            max_connections: default_max_connections(),
        }
    }
}

/// Configuration errors
#[derive(Debug, Clone)]
pub enum ConfigError {
    Io { path: String, error: String },
    Parse(String),
    Env { key: String, value: String },
    Invalid(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io { path, error } => {
                write!(f, "Failed to read config file '{}': {}", path, error)
            }
            ConfigError::Parse(e) => write!(f, "Failed to parse config: {}", e),
            ConfigError::Env { key, value } => {
                write!(f, "Invalid value '{}' for environment variable {}", value, key)
            }
            ConfigError::Invalid(e) => write!(f, "Invalid config: {}", e),
        }
    }
}

impl std::error::Error for ConfigError {}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_parse_minimal_config() {
        let config = RegistryConfig::from_json("{}").unwrap();
        assert_eq!(config.server.port, 8000);
        assert_eq!(config.provider.base_url, "https://api.coingecko.com/api/v3");
        assert_eq!(config.provider.timeout(), Duration::from_secs(10));
        assert_eq!(config.reconciliation.interval_secs, 86_400);
        assert!(config.reconciliation.enabled);
        assert_eq!(config.storage.backend, StorageBackend::InMemory);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_full_config() {
        let json = r#"{
            "server": { "host": "127.0.0.1", "port": 9000 },
            "provider": { "api_key": "demo", "timeout_secs": 3 },
            "reconciliation": { "enabled": false, "interval_secs": 60, "run_on_startup": true },
            "storage": { "backend": "postgres", "database_url": "postgres://localhost/coins" }
        }"#;

        let config = RegistryConfig::from_json(json).unwrap();
        assert_eq!(config.bind_address(), "127.0.0.1:9000");
        assert_eq!(config.provider.api_key.as_deref(), Some("demo"));
        assert!(!config.reconciliation.enabled);
        assert!(config.reconciliation.run_on_startup);
        assert_eq!(config.storage.backend, StorageBackend::Postgres);
        assert_eq!(config.storage.max_connections, 5);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_unknown_backend_rejected() {
        let json = r#"{ "storage": { "backend": "sqlite" } }"#;
        assert!(matches!(
            RegistryConfig::from_json(json),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_env_overrides() {
        let mut config = RegistryConfig::default();
        config
            .apply_overrides(env(&[
                ("PORT", "8123"),
                ("DATABASE_URL", "postgres://db/registry"),
                ("COINGECKO_API_KEY", "secret"),
                ("REFRESH_INTERVAL_SECS", "300"),
            ]))
            .unwrap();

        assert_eq!(config.server.port, 8123);
        assert_eq!(config.storage.backend, StorageBackend::Postgres);
        assert_eq!(
            config.storage.database_url.as_deref(),
            Some("postgres://db/registry")
        );
        assert_eq!(config.provider.api_key.as_deref(), Some("secret"));
        assert_eq!(config.reconciliation.interval(), Duration::from_secs(300));
    }

    #[test]
    fn test_bad_env_value_rejected() {
        let mut config = RegistryConfig::default();
        let err = config.apply_overrides(env(&[("PORT", "eighty")])).unwrap_err();
        assert!(err.to_string().contains("PORT"));
    }

    #[test]
    fn test_postgres_requires_url() {
        let mut config = RegistryConfig::default();
        config.storage.backend = StorageBackend::Postgres;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_zero_interval_rejected() {
        let mut config = RegistryConfig::default();
        config.reconciliation.interval_secs = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_oversized_interval_rejected() {
        let mut config = RegistryConfig::default();
        config
            .apply_overrides(env(&[("REFRESH_INTERVAL_SECS", "18446744073709551615")]))
            .unwrap();
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));

        config.reconciliation.interval_secs = MAX_RECONCILIATION_INTERVAL_SECS;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_oversized_timeout_rejected() {
        let mut config = RegistryConfig::default();
        config.provider.timeout_secs = MAX_PROVIDER_TIMEOUT_SECS + 1;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }
}
