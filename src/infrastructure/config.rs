//! # Configuration
//!
//! Layered process configuration.
//!
//! Precedence, lowest to highest:
//!
//! 1. [`AppConfig::default`]
//! 2. An optional file (`config/default.toml` unless a path is given; TOML, YAML
//!    or JSON by extension)
//! 3. Environment variables prefixed `AGGREGATOR__`, with `__` separating
//!    nested keys (e.g. `AGGREGATOR__BANKS__FASTBANK__BASE_URL`)

use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

/// Default configuration file, read when present.
pub const DEFAULT_CONFIG_FILE: &str = "config/default.toml";

/// Environment variable prefix.
pub const ENV_PREFIX: &str = "AGGREGATOR";

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Configuration error.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A source could not be read or deserialized.
    #[error("failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),

    /// A value is out of range.
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

impl ConfigError {
    fn invalid(message: impl Into<String>) -> Self {
        Self::Invalid(message.into())
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// One JSON object per line.
    Json,
    /// Human-readable multi-line output.
    #[default]
    Pretty,
}

/// HTTP listener settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Bind address.
    pub host: String,
    /// Bind port.
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

impl ServerConfig {
    /// Returns `host:port`.
    #[must_use]
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Database settings. Without a URL the in-memory store is used.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// PostgreSQL connection URL.
    pub url: Option<String>,
    /// Pool size.
    pub max_connections: u32,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: None,
            max_connections: 10,
        }
    }
}

/// One bank endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BankEndpointConfig {
    /// API base URL; empty disables the bank.
    pub base_url: String,
    /// Per-call timeout.
    pub timeout_secs: u64,
}

impl Default for BankEndpointConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            timeout_secs: 30,
        }
    }
}

impl BankEndpointConfig {
    /// Returns true if a base URL is configured.
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        !self.base_url.trim().is_empty()
    }

    /// Returns the timeout in milliseconds.
    #[must_use]
    pub fn timeout_ms(&self) -> u64 {
        self.timeout_secs.saturating_mul(1000)
    }
}

/// Bank endpoints.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BanksConfig {
    /// FastBank endpoint.
    pub fastbank: BankEndpointConfig,
    /// SolidBank endpoint.
    pub solidbank: BankEndpointConfig,
}

/// Reconciliation loop settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReconciliationConfig {
    /// Seconds between passes.
    pub interval_secs: u64,
}

impl Default for ReconciliationConfig {
    fn default() -> Self {
        Self { interval_secs: 5 }
    }
}

impl ReconciliationConfig {
    /// Returns the pass interval.
    #[must_use]
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }
}

/// Logging settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Default level; `RUST_LOG` overrides it.
    pub level: String,
    /// Output format.
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::default(),
        }
    }
}

/// Root configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    /// HTTP listener.
    pub server: ServerConfig,
    /// Persistence.
    pub database: DatabaseConfig,
    /// Bank endpoints.
    pub banks: BanksConfig,
    /// Reconciliation loop.
    pub reconciliation: ReconciliationConfig,
    /// Logging.
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Loads the layered configuration.
    ///
    /// `path` names the configuration file; without it [`DEFAULT_CONFIG_FILE`]
    /// is read if present. An explicitly given file must exist.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Load` if a source is unreadable and
    /// `ConfigError::Invalid` if the result fails [`AppConfig::validate`].
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let file = match path {
            Some(path) => File::from(path).required(true),
            None => File::with_name(DEFAULT_CONFIG_FILE).required(false),
        };

        let config: Self = Config::builder()
            .add_source(Config::try_from(&Self::default())?)
            .add_source(file)
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()?;

        config.validate()?;
        Ok(config)
    }

    /// Checks value ranges.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` describing the first offending value.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.reconciliation.interval_secs == 0 {
            return Err(ConfigError::invalid(
                "reconciliation.interval_secs must be at least 1",
            ));
        }

        if self.database.max_connections == 0 {
            return Err(ConfigError::invalid(
                "database.max_connections must be at least 1",
            ));
        }

        for (name, bank) in [
            ("fastbank", &self.banks.fastbank),
            ("solidbank", &self.banks.solidbank),
        ] {
            if bank.timeout_secs == 0 {
                return Err(ConfigError::invalid(format!(
                    "banks.{name}.timeout_secs must be at least 1"
                )));
            }
        }

        let level = self.logging.level.to_ascii_lowercase();
        if !LOG_LEVELS.contains(&level.as_str()) {
            return Err(ConfigError::invalid(format!(
                "logging.level must be one of {}, got {}",
                LOG_LEVELS.join(", "),
                self.logging.level
            )));
        }

        Ok(())
    }

    /// Returns the enabled banks as `(section, endpoint)` pairs.
    #[must_use]
    pub fn enabled_banks(&self) -> Vec<(&'static str, &BankEndpointConfig)> {
        [
            ("fastbank", &self.banks.fastbank),
            ("solidbank", &self.banks.solidbank),
        ]
        .into_iter()
        .filter(|(_, bank)| bank.is_enabled())
        .collect()
    }
}
