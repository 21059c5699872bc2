//! Environment-driven configuration, loaded once at startup.
//!
//! Explicit `std::env::var` plus a `thiserror` error type, matching the
//! teacher's preference for typed construction over framework magic rather
//! than an `envy`-style derive.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing environment variable {0}")]
    Missing(&'static str),
    #[error("{0} must be exactly 32 bytes, got {1}")]
    BadKeyLength(&'static str, usize),
}

/// Relational connection settings for the `TenantRegistry` (spec §6).
pub struct DbConfig {
    pub host: String,
    pub port: String,
    pub name: String,
    pub user: String,
    pub password: String,
}

impl DbConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            host: require("DB_HOST")?,
            port: require("DB_PORT")?,
            name: require("DB_NAME")?,
            user: require("DB_USER")?,
            password: require("DB_PASSWORD")?,
        })
    }

    pub fn connection_url(&self) -> String {
        format!(
            "postgres://{}:{}@{}:{}/{}",
            self.user, self.password, self.host, self.port, self.name
        )
    }
}

/// ClickHouse connection settings for the `ColdStore` (spec §6).
pub struct ColdStoreConfig {
    pub host: String,
    pub username: String,
    pub password: String,
    pub secure: bool,
}

impl ColdStoreConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            host: require("CLICKHOUSE_HOST")?,
            username: require("CLICKHOUSE_USERNAME")?,
            password: require("CLICKHOUSE_PASSWORD")?,
            secure: std::env::var("CLICKHOUSE_SECURE")
                .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
                .unwrap_or(false),
        })
    }
}

/// Redis connection settings for the `StagingCache` (spec §6).
pub struct StagingCacheConfig {
    pub host: String,
    pub port: String,
    pub username: Option<String>,
    pub password: Option<String>,
}

impl StagingCacheConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            host: require("REDIS_HOST")?,
            port: require("REDIS_PORT")?,
            username: std::env::var("REDIS_USERNAME").ok(),
            password: std::env::var("REDIS_PASSWORD").ok(),
        })
    }

    pub fn connection_url(&self) -> String {
        match (&self.username, &self.password) {
            (Some(user), Some(pass)) => {
                format!("redis://{user}:{pass}@{}:{}", self.host, self.port)
            }
            (None, Some(pass)) => format!("redis://:{pass}@{}:{}", self.host, self.port),
            _ => format!("redis://{}:{}", self.host, self.port),
        }
    }
}

/// The crypto key (spec §4.1/§6): `AES_SECRET_KEY`, exactly 32 raw bytes.
pub fn aes_secret_key() -> Result<[u8; 32], ConfigError> {
    let raw = require("AES_SECRET_KEY")?;
    let bytes = raw.into_bytes();
    if bytes.len() != 32 {
        return Err(ConfigError::BadKeyLength("AES_SECRET_KEY", bytes.len()));
    }
    let mut key = [0u8; 32];
    key.copy_from_slice(&bytes);
    Ok(key)
}

fn require(name: &'static str) -> Result<String, ConfigError> {
    std::env::var(name).map_err(|_| ConfigError::Missing(name))
}
