//! Configuration for the cost estimator

use core_config::cache::CacheConfig;
use core_config::database::DatabaseConfig;
use core_config::server::ServerConfig;
use core_config::{ConfigError, Environment, FromEnv, env_optional, env_parse};
use std::path::PathBuf;
use std::str::FromStr;

/// Where pricing documents come from (`PRICING_STORE`)
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StoreBackend {
    Postgres,
    File,
    Sample,
}

impl FromStr for StoreBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "postgres" => Ok(StoreBackend::Postgres),
            "file" => Ok(StoreBackend::File),
            "sample" => Ok(StoreBackend::Sample),
            other => Err(format!(
                "unknown pricing store '{}' (expected postgres, file or sample)",
                other
            )),
        }
    }
}

#[derive(Clone, Debug)]
pub struct StoreConfig {
    pub backend: StoreBackend,
    pub database: Option<DatabaseConfig>,
    pub data_file: Option<PathBuf>,
}

impl FromEnv for StoreConfig {
    /// - PRICING_STORE: defaults to `postgres` when DATABASE_URL is set, `sample` otherwise
    /// - DATABASE_URL: required for `postgres`
    /// - PRICING_DATA_FILE: required for `file`
    fn from_env() -> Result<Self, ConfigError> {
        let database_url = env_optional("DATABASE_URL");
        let fallback = if database_url.is_some() {
            StoreBackend::Postgres
        } else {
            StoreBackend::Sample
        };
        let backend = env_parse("PRICING_STORE", fallback)?;
        let data_file = env_optional("PRICING_DATA_FILE").map(PathBuf::from);

        match backend {
            StoreBackend::Postgres if database_url.is_none() => {
                return Err(ConfigError::MissingEnvVar("DATABASE_URL".to_string()));
            }
            StoreBackend::File if data_file.is_none() => {
                return Err(ConfigError::MissingEnvVar("PRICING_DATA_FILE".to_string()));
            }
            _ => {}
        }

        Ok(Self {
            backend,
            database: database_url.map(DatabaseConfig::new),
            data_file,
        })
    }
}

#[derive(Clone, Debug)]
pub struct Config {
    pub environment: Environment,
    pub server: ServerConfig,
    pub store: StoreConfig,
    pub cache: CacheConfig,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            environment: Environment::from_env(),
            server: ServerConfig::from_env()?,
            store: StoreConfig::from_env()?,
            cache: CacheConfig::from_env()?,
        })
    }
}
