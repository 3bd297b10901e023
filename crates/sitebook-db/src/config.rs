//! # Configuration
//!
//! Settings for the SiteBook binaries and any embedding application.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     SITEBOOK_DB_PATH=/srv/sitebook/sitebook.db                         │
//! │     SITEBOOK_MAX_CONNECTIONS=8                                         │
//! │     SITEBOOK_LOG=debug                                                 │
//! │                                                                         │
//! │  2. TOML Config File                                                   │
//! │     explicit --config path, or                                         │
//! │     ~/.config/sitebook/sitebook.toml (Linux)                           │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! │     ./sitebook.db, 5 connections, info logging                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! # sitebook.toml
//! log_level = "info,sitebook=debug"
//! default_currency_display = "USD"
//!
//! [database]
//! path = "/var/lib/sitebook/sitebook.db"
//! max_connections = 5
//! busy_timeout_secs = 5
//! ```

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

use crate::pool::DbConfig;
use sitebook_core::CurrencyCode;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The config file exists but couldn't be read.
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    /// The config file isn't valid TOML for [`AppConfig`].
    #[error("Failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),

    /// A setting is out of range.
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

// =============================================================================
// Database Settings
// =============================================================================

/// The `[database]` table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseSettings {
    /// SQLite file. Created on first connect.
    #[serde(default = "default_db_path")]
    pub path: PathBuf,

    /// Pool size.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,

    /// How long a create waits for a concurrent create's write lock.
    #[serde(default = "default_busy_timeout")]
    pub busy_timeout_secs: u64,
}

fn default_db_path() -> PathBuf {
    PathBuf::from("sitebook.db")
}

fn default_max_connections() -> u32 {
    5
}

fn default_busy_timeout() -> u64 {
    5
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_currency_display() -> String {
    sitebook_core::currency::DEFAULT_CURRENCY.to_string()
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        DatabaseSettings {
            path: default_db_path(),
            max_connections: default_max_connections(),
            busy_timeout_secs: default_busy_timeout(),
        }
    }
}

// =============================================================================
// App Config
// =============================================================================

/// Top-level configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub database: DatabaseSettings,

    /// `EnvFilter` directives used when `RUST_LOG` is unset.
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Currency listed first on dashboards when present.
    #[serde(default = "default_currency_display")]
    pub default_currency_display: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            database: DatabaseSettings::default(),
            log_level: default_log_level(),
            default_currency_display: default_currency_display(),
        }
    }
}

impl AppConfig {
    /// Loads configuration from file and environment.
    ///
    /// A missing file is not an error; an unreadable or malformed one is.
    pub fn load(config_path: Option<PathBuf>) -> ConfigResult<Self> {
        let mut config = Self::default();

        if let Some(path) = config_path.or_else(Self::default_config_path) {
            if path.exists() {
                info!(?path, "Loading config from file");
                let contents = std::fs::read_to_string(&path)?;
                config = toml::from_str(&contents)?;
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_overrides(|key| std::env::var(key).ok());
        config.validate()?;

        Ok(config)
    }

    /// Checks the settings.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.database.path.as_os_str().is_empty() {
            return Err(ConfigError::Invalid("database.path must not be empty".into()));
        }

        if self.database.max_connections == 0 {
            return Err(ConfigError::Invalid(
                "database.max_connections must be at least 1".into(),
            ));
        }

        CurrencyCode::parse(&self.default_currency_display)
            .map_err(|e| ConfigError::Invalid(format!("default_currency_display: {}", e)))?;

        EnvFilter::try_new(&self.log_level)
            .map_err(|e| ConfigError::Invalid(format!("log_level: {}", e)))?;

        Ok(())
    }

    /// Applies `SITEBOOK_*` overrides read through `lookup`.
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(path) = lookup("SITEBOOK_DB_PATH") {
            debug!(path = %path, "Overriding database path from environment");
            self.database.path = PathBuf::from(path);
        }

        if let Some(max) = lookup("SITEBOOK_MAX_CONNECTIONS") {
            match max.parse::<u32>() {
                Ok(n) => self.database.max_connections = n,
                Err(_) => warn!(value = %max, "Ignoring invalid SITEBOOK_MAX_CONNECTIONS"),
            }
        }

        if let Some(level) = lookup("SITEBOOK_LOG") {
            self.log_level = level;
        }
    }

    /// The currency shown first on dashboard cards.
    pub fn display_currency(&self) -> CurrencyCode {
        CurrencyCode::normalize(Some(self.default_currency_display.as_str()))
    }

    /// Pool settings for [`Database::new`](crate::Database::new).
    pub fn db_config(&self) -> DbConfig {
        DbConfig::new(&self.database.path)
            .max_connections(self.database.max_connections)
            .busy_timeout(Duration::from_secs(self.database.busy_timeout_secs))
    }

    fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "sitebook", "sitebook")
            .map(|dirs| dirs.config_dir().join("sitebook.toml"))
    }
}

/// Installs the global `tracing` subscriber.
///
/// `RUST_LOG` wins over `default_directives` when set.
pub fn init_tracing(default_directives: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("{},sqlx=warn", default_directives)));

    tracing_subscriber::fmt().with_env_filter(filter).init();
}
