use crate::{ConfigError, FromEnv, env_optional, env_parse};
use std::str::FromStr;
use std::time::Duration;

/// Default lifetime of a cached pricing document
pub const DEFAULT_CACHE_TTL_SECS: u64 = 3600;

/// Which pricing cache to run with (`PRICING_CACHE`)
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CacheBackend {
    Redis,
    Memory,
    None,
}

impl FromStr for CacheBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "redis" => Ok(CacheBackend::Redis),
            "memory" => Ok(CacheBackend::Memory),
            "none" | "off" => Ok(CacheBackend::None),
            other => Err(format!("unknown cache backend '{}' (expected redis, memory or none)", other)),
        }
    }
}

/// Pricing cache configuration
#[derive(Clone, Debug)]
pub struct CacheConfig {
    pub backend: CacheBackend,
    pub redis_url: Option<String>,
    pub ttl: Duration,
}

impl FromEnv for CacheConfig {
    /// - PRICING_CACHE: `redis`, `memory` or `none`; defaults to `redis` when
    ///   REDIS_HOST is set, `memory` otherwise
    /// - REDIS_HOST: required for the redis backend
    /// - PRICING_CACHE_TTL_SECS: defaults to 3600
    fn from_env() -> Result<Self, ConfigError> {
        let redis_url = env_optional("REDIS_HOST");
        let fallback = if redis_url.is_some() {
            CacheBackend::Redis
        } else {
            CacheBackend::Memory
        };
        let backend = env_parse("PRICING_CACHE", fallback)?;

        if backend == CacheBackend::Redis && redis_url.is_none() {
            return Err(ConfigError::MissingEnvVar("REDIS_HOST".to_string()));
        }

        let ttl_secs = env_parse("PRICING_CACHE_TTL_SECS", DEFAULT_CACHE_TTL_SECS)?;

        Ok(Self {
            backend,
            redis_url,
            ttl: Duration::from_secs(ttl_secs),
        })
    }
}
