use serde::Deserialize;
use std::env;

use crate::sessions::MAX_SESSION_TTL_SECONDS;

pub use ::config::ConfigError;

// Top-level container for every setting
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub app: AppConfig,
    pub storage: StorageConfig,
    pub database: DatabaseConfig,
    #[serde(default)]
    pub redis: RedisConfig,
    pub auth: AuthConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub environment: String,
    pub rust_log: String,
    pub log_format: LogFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Pretty,
    Json,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    /// Postgres for records, Redis for sessions.
    Postgres,
    /// Everything in process; nothing survives a restart.
    Memory,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    pub backend: StorageBackend,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub url: Option<String>,
    pub pool_size: u32,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RedisConfig {
    pub url: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    pub session_ttl_seconds: u64,
    pub bcrypt_cost: u32,
    pub cookie_secure: bool,
}

/// Environment variables and the settings they override.
const ENV_OVERRIDES: &[(&str, &str)] = &[
    ("app.host", "HOST"),
    ("app.port", "PORT"),
    ("app.environment", "ENVIRONMENT"),
    ("app.rust_log", "RUST_LOG"),
    ("app.log_format", "LOG_FORMAT"),
    ("storage.backend", "STORAGE_BACKEND"),
    ("database.url", "DATABASE_URL"),
    ("database.pool_size", "DB_POOL_SIZE"),
    ("redis.url", "REDIS_URL"),
    ("auth.session_ttl_seconds", "SESSION_TTL_SECONDS"),
    ("auth.bcrypt_cost", "BCRYPT_COST"),
    ("auth.cookie_secure", "COOKIE_SECURE"),
];

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Builds the config from defaults plus whatever `lookup` returns per variable.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut builder = ::config::Config::builder()
            .set_default("app.host", "0.0.0.0")?
            .set_default("app.port", 8000_i64)?
            .set_default("app.environment", "development")?
            .set_default("app.rust_log", "movie_theater=debug,tower_http=debug")?
            .set_default("app.log_format", "pretty")?
            .set_default("storage.backend", "postgres")?
            .set_default("database.pool_size", 20_i64)?
            .set_default("auth.session_ttl_seconds", 1_209_600_i64)?
            .set_default("auth.bcrypt_cost", i64::from(bcrypt::DEFAULT_COST))?
            .set_default("auth.cookie_secure", false)?;

        for (key, var) in ENV_OVERRIDES {
            builder = builder.set_override_option(*key, lookup(var))?;
        }

        let config: Config = builder.build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if !(1..=MAX_SESSION_TTL_SECONDS).contains(&self.auth.session_ttl_seconds) {
            return Err(ConfigError::Message(format!(
                "SESSION_TTL_SECONDS must be between 1 and {}, got {}",
                MAX_SESSION_TTL_SECONDS, self.auth.session_ttl_seconds
            )));
        }
        if !(4..=31).contains(&self.auth.bcrypt_cost) {
            return Err(ConfigError::Message(format!(
                "BCRYPT_COST must be between 4 and 31, got {}",
                self.auth.bcrypt_cost
            )));
        }
        if self.storage.backend == StorageBackend::Postgres {
            if self.database.url.is_none() {
                return Err(ConfigError::Message(
                    "DATABASE_URL must be set when STORAGE_BACKEND=postgres".to_string(),
                ));
            }
            if self.redis.url.is_none() {
                return Err(ConfigError::Message(
                    "REDIS_URL must be set when STORAGE_BACKEND=postgres".to_string(),
                ));
            }
        }
        Ok(())
    }

    /// In-memory settings with the cheapest bcrypt cost, for tests and demos.
    pub fn in_memory() -> Self {
        Config {
            app: AppConfig {
                host: "127.0.0.1".to_string(),
                port: 0,
                environment: "test".to_string(),
                rust_log: "movie_theater=debug".to_string(),
                log_format: LogFormat::Pretty,
            },
            storage: StorageConfig {
                backend: StorageBackend::Memory,
            },
            database: DatabaseConfig {
                url: None,
                pool_size: 1,
            },
            redis: RedisConfig { url: None },
            auth: AuthConfig {
                session_ttl_seconds: 3600,
                bcrypt_cost: 4,
                cookie_secure: false,
            },
        }
    }
}
