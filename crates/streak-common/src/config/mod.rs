//! Configuration structs

mod app_config;

pub use app_config::{
    AppConfig, AppSettings, CheckinPolicyConfig, ConfigError, DatabaseConfig, Environment,
    LeaderboardConfig, RedisConfig, ServerConfig, StorageBackend,
};
