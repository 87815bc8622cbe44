//! Application configuration structs
//!
//! Loads configuration from environment variables (and a `.env` file when present).

use serde::Deserialize;
use std::env;
use std::time::Duration;

/// Main application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub app: AppSettings,
    pub api: ServerConfig,
    pub storage: StorageBackend,
    /// Present when `storage` is [`StorageBackend::Postgres`]
    pub database: Option<DatabaseConfig>,
    /// Present when `storage` is [`StorageBackend::Postgres`]
    pub redis: Option<RedisConfig>,
    pub leaderboard: LeaderboardConfig,
    pub checkin: CheckinPolicyConfig,
}

/// General application settings
#[derive(Debug, Clone, Deserialize)]
pub struct AppSettings {
    #[serde(default = "default_app_name")]
    pub name: String,
    #[serde(default = "default_env")]
    pub env: Environment,
}

/// Environment type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Staging,
    Production,
}

impl Environment {
    #[must_use]
    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }

    #[must_use]
    pub fn is_development(&self) -> bool {
        matches!(self, Self::Development)
    }
}

/// Which backends hold the record store, index and stream
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    /// PostgreSQL record store with Redis index and stream
    #[default]
    Postgres,
    /// In-process backends, nothing survives a restart
    Memory,
}

impl std::str::FromStr for StorageBackend {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "postgres" => Ok(Self::Postgres),
            "memory" => Ok(Self::Memory),
            other => Err(ConfigError::InvalidValue("STORAGE_BACKEND", other.to_string())),
        }
    }
}

/// HTTP listener configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    #[must_use]
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Database configuration
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
}

/// Redis configuration
#[derive(Debug, Clone, Deserialize)]
pub struct RedisConfig {
    pub url: String,
    #[serde(default = "default_redis_max_connections")]
    pub max_connections: u32,
}

/// Leaderboard keys and query limits
#[derive(Debug, Clone, Deserialize)]
pub struct LeaderboardConfig {
    #[serde(default = "default_leaderboard_key")]
    pub key: String,
    #[serde(default = "default_stream_key")]
    pub stream: String,
    #[serde(default = "default_limit")]
    pub default_limit: usize,
    #[serde(default = "default_max_limit")]
    pub max_limit: usize,
}

impl Default for LeaderboardConfig {
    fn default() -> Self {
        Self {
            key: default_leaderboard_key(),
            stream: default_stream_key(),
            default_limit: default_limit(),
            max_limit: default_max_limit(),
        }
    }
}

/// Timeouts and retry policy of the check-in path
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CheckinPolicyConfig {
    /// Bound on each record store call
    pub store_timeout: Duration,
    /// Bound on each index or stream call
    pub advisory_timeout: Duration,
    /// Attempts for an authoritative call, including the first
    pub max_retries: u32,
    pub retry_base_delay: Duration,
}

impl Default for CheckinPolicyConfig {
    fn default() -> Self {
        Self {
            store_timeout: Duration::from_millis(2000),
            advisory_timeout: Duration::from_millis(500),
            max_retries: 3,
            retry_base_delay: Duration::from_millis(50),
        }
    }
}

// Default value functions
fn default_app_name() -> String {
    "streak-server".to_string()
}

fn default_env() -> Environment {
    Environment::Development
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_max_connections() -> u32 {
    20
}

fn default_min_connections() -> u32 {
    5
}

fn default_redis_max_connections() -> u32 {
    10
}

fn default_leaderboard_key() -> String {
    "leaderboard:global".to_string()
}

fn default_stream_key() -> String {
    "leaderboard_events".to_string()
}

fn default_limit() -> usize {
    50
}

fn default_max_limit() -> usize {
    500
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// # Errors
    /// Returns an error if required environment variables are missing
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the configuration from an arbitrary variable source
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let parsed = |key: &str| lookup(key).and_then(|s| s.parse::<u64>().ok());
        let millis = |key: &str, default: Duration| {
            parsed(key).map_or(default, Duration::from_millis)
        };

        let storage = lookup("STORAGE_BACKEND")
            .map(|s| s.parse::<StorageBackend>())
            .transpose()?
            .unwrap_or_default();

        let (database, redis) = match storage {
            StorageBackend::Memory => (None, None),
            StorageBackend::Postgres => (
                Some(DatabaseConfig {
                    url: lookup("DATABASE_URL").ok_or(ConfigError::MissingVar("DATABASE_URL"))?,
                    max_connections: lookup("DATABASE_MAX_CONNECTIONS")
                        .and_then(|s| s.parse().ok())
                        .unwrap_or_else(default_max_connections),
                    min_connections: lookup("DATABASE_MIN_CONNECTIONS")
                        .and_then(|s| s.parse().ok())
                        .unwrap_or_else(default_min_connections),
                }),
                Some(RedisConfig {
                    url: lookup("REDIS_URL").ok_or(ConfigError::MissingVar("REDIS_URL"))?,
                    max_connections: lookup("REDIS_MAX_CONNECTIONS")
                        .and_then(|s| s.parse().ok())
                        .unwrap_or_else(default_redis_max_connections),
                }),
            ),
        };

        let leaderboard = LeaderboardConfig {
            key: lookup("LEADERBOARD_KEY").unwrap_or_else(default_leaderboard_key),
            stream: lookup("LEADERBOARD_STREAM").unwrap_or_else(default_stream_key),
            default_limit: lookup("LEADERBOARD_DEFAULT_LIMIT")
                .and_then(|s| s.parse().ok())
                .unwrap_or_else(default_limit),
            max_limit: lookup("LEADERBOARD_MAX_LIMIT")
                .and_then(|s| s.parse().ok())
                .unwrap_or_else(default_max_limit),
        };
        if leaderboard.default_limit == 0 || leaderboard.default_limit > leaderboard.max_limit {
            return Err(ConfigError::InvalidValue(
                "LEADERBOARD_DEFAULT_LIMIT",
                format!(
                    "{} (must be between 1 and LEADERBOARD_MAX_LIMIT={})",
                    leaderboard.default_limit, leaderboard.max_limit
                ),
            ));
        }

        let defaults = CheckinPolicyConfig::default();
        let checkin = CheckinPolicyConfig {
            store_timeout: millis("CHECKIN_STORE_TIMEOUT_MS", defaults.store_timeout),
            advisory_timeout: millis("CHECKIN_ADVISORY_TIMEOUT_MS", defaults.advisory_timeout),
            max_retries: lookup("CHECKIN_MAX_RETRIES")
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.max_retries),
            retry_base_delay: millis("CHECKIN_RETRY_BASE_DELAY_MS", defaults.retry_base_delay),
        };
        if checkin.max_retries == 0 {
            return Err(ConfigError::InvalidValue("CHECKIN_MAX_RETRIES", "0".to_string()));
        }

        Ok(Self {
            app: AppSettings {
                name: lookup("APP_NAME").unwrap_or_else(default_app_name),
                env: lookup("APP_ENV")
                    .and_then(|s| match s.to_lowercase().as_str() {
                        "production" => Some(Environment::Production),
                        "staging" => Some(Environment::Staging),
                        "development" => Some(Environment::Development),
                        _ => None,
                    })
                    .unwrap_or_default(),
            },
            api: ServerConfig {
                host: lookup("API_HOST").unwrap_or_else(default_host),
                port: lookup("API_PORT")
                    .and_then(|s| s.parse().ok())
                    .ok_or(ConfigError::MissingVar("API_PORT"))?,
            },
            storage,
            database,
            redis,
            leaderboard,
            checkin,
        })
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingVar(&'static str),

    #[error("Invalid value for {0}: {1}")]
    InvalidValue(&'static str, String),
}
