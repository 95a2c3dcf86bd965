//! Process configuration read from environment variables.
//!
//! | Variable | Default |
//! |----------|---------|
//! | `HOST` | `0.0.0.0` |
//! | `PORT` | `8080` |
//! | `STORAGE_MODE` | `in_memory` (or `postgres`) |
//! | `DATABASE_URL` | required when `STORAGE_MODE=postgres` |
//! | `DATABASE_POOL_SIZE` | `8` |

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::str::FromStr;

use thiserror::Error;

const DEFAULT_PORT: u16 = 8080;
const DEFAULT_POOL_SIZE: u32 = 8;

/// Where board and workspace data is kept.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StorageMode {
    /// Process-local maps; data is lost on restart.
    #[default]
    InMemory,
    /// `PostgreSQL` through Diesel.
    Postgres,
}

impl FromStr for StorageMode {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "in_memory" | "memory" => Ok(Self::InMemory),
            "postgres" | "postgresql" => Ok(Self::Postgres),
            other => Err(ConfigError::InvalidValue {
                key: "STORAGE_MODE",
                message: format!("unknown storage mode `{other}`"),
            }),
        }
    }
}

/// Errors raised while reading configuration.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// A required variable is unset.
    #[error("missing environment variable {0}")]
    Missing(&'static str),
    /// A variable is set to something unusable.
    #[error("invalid value for {key}: {message}")]
    InvalidValue {
        /// Variable name.
        key: &'static str,
        /// What is wrong with it.
        message: String,
    },
}

/// Validated process configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Interface to bind.
    pub host: IpAddr,
    /// Port to bind.
    pub port: u16,
    /// Selected storage backend.
    pub storage_mode: StorageMode,
    /// Connection string; present whenever `storage_mode` is `Postgres`.
    pub database_url: Option<String>,
    /// Maximum pooled connections.
    pub pool_size: u32,
}

impl AppConfig {
    /// Reads configuration from the process environment.
    ///
    /// # Errors
    ///
    /// See [`AppConfig::from_lookup`].
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads configuration through `lookup`, which returns the value of a
    /// variable when it is set.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] for unparsable values and
    /// [`ConfigError::Missing`] when `DATABASE_URL` is absent in postgres
    /// mode.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let host: IpAddr =
            parsed(&lookup, "HOST")?.unwrap_or(IpAddr::V4(Ipv4Addr::UNSPECIFIED));
        let port = parsed(&lookup, "PORT")?.unwrap_or(DEFAULT_PORT);
        let storage_mode = lookup("STORAGE_MODE")
            .map(|value| value.parse::<StorageMode>())
            .transpose()?
            .unwrap_or_default();
        let pool_size = parsed(&lookup, "DATABASE_POOL_SIZE")?.unwrap_or(DEFAULT_POOL_SIZE);
        if pool_size == 0 {
            return Err(ConfigError::InvalidValue {
                key: "DATABASE_POOL_SIZE",
                message: "must be at least 1".to_owned(),
            });
        }

        let database_url = lookup("DATABASE_URL").filter(|url| !url.trim().is_empty());
        if storage_mode == StorageMode::Postgres && database_url.is_none() {
            return Err(ConfigError::Missing("DATABASE_URL"));
        }

        Ok(Self {
            host,
            port,
            storage_mode,
            database_url,
            pool_size,
        })
    }

    /// Socket address to bind.
    #[must_use]
    pub const fn bind_address(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

fn parsed<T>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &'static str,
) -> Result<Option<T>, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    lookup(key)
        .map(|raw| {
            raw.trim()
                .parse::<T>()
                .map_err(|err| ConfigError::InvalidValue {
                    key,
                    message: err.to_string(),
                })
        })
        .transpose()
}
