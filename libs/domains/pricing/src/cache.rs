//! Fast lookaside cache for pricing documents.
//!
//! The cache is optional and never authoritative: callers treat every
//! [`CacheError`] as a miss.

use async_trait::async_trait;
use redis::AsyncCommands;
use redis::aio::ConnectionManager;
use std::collections::HashMap;
use std::sync::RwLock;
use std::time::{Duration, Instant};
use thiserror::Error;
use tracing::info;

use crate::models::PricingDocument;

/// Cache-layer failures
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("Redis error: {0}")]
    Redis(#[from] redis::RedisError),

    #[error("Cached value could not be (de)serialized: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Cache unavailable: {0}")]
    Unavailable(String),
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PricingCache: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<PricingDocument>, CacheError>;

    async fn set_with_expiry(
        &self,
        key: &str,
        document: &PricingDocument,
        ttl: Duration,
    ) -> Result<(), CacheError>;
}

/// Redis-backed cache storing documents as JSON strings
#[derive(Clone)]
pub struct RedisPricingCache {
    conn: ConnectionManager,
}

impl RedisPricingCache {
    pub fn new(conn: ConnectionManager) -> Self {
        Self { conn }
    }

    /// Open a managed connection and verify it with `PING`
    pub async fn connect(url: &str) -> Result<Self, CacheError> {
        info!("Connecting pricing cache to Redis at {}", url);

        let client = redis::Client::open(url)?;
        let manager = ConnectionManager::new(client).await?;

        let mut conn = manager.clone();
        let _: String = redis::cmd("PING").query_async(&mut conn).await?;

        info!("Pricing cache connected");
        Ok(Self::new(manager))
    }
}

#[async_trait]
impl PricingCache for RedisPricingCache {
    async fn get(&self, key: &str) -> Result<Option<PricingDocument>, CacheError> {
        let mut conn = self.conn.clone();
        let raw: Option<String> = conn.get(key).await?;
        raw.map(|value| serde_json::from_str(&value))
            .transpose()
            .map_err(CacheError::from)
    }

    async fn set_with_expiry(
        &self,
        key: &str,
        document: &PricingDocument,
        ttl: Duration,
    ) -> Result<(), CacheError> {
        let value = serde_json::to_string(document)?;
        let mut conn = self.conn.clone();
        conn.set_ex::<_, _, ()>(key, value, ttl.as_secs().max(1))
            .await?;
        Ok(())
    }
}

/// Process-local cache with per-entry expiry
#[derive(Default)]
pub struct InMemoryPricingCache {
    entries: RwLock<HashMap<String, (PricingDocument, Instant)>>,
}

impl InMemoryPricingCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.read().map(|e| e.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn poisoned() -> CacheError {
    CacheError::Unavailable("in-memory cache lock poisoned".to_string())
}

#[async_trait]
impl PricingCache for InMemoryPricingCache {
    async fn get(&self, key: &str) -> Result<Option<PricingDocument>, CacheError> {
        let entries = self.entries.read().map_err(|_| poisoned())?;
        Ok(entries
            .get(key)
            .filter(|(_, expires_at)| *expires_at > Instant::now())
            .map(|(doc, _)| doc.clone()))
    }

    async fn set_with_expiry(
        &self,
        key: &str,
        document: &PricingDocument,
        ttl: Duration,
    ) -> Result<(), CacheError> {
        let mut entries = self.entries.write().map_err(|_| poisoned())?;
        let now = Instant::now();
        entries.retain(|_, (_, expires_at)| *expires_at > now);
        entries.insert(key.to_string(), (document.clone(), now + ttl));
        Ok(())
    }
}
