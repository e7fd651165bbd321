//! Builds the pricing store, cache and estimator from configuration

use core_config::cache::{CacheBackend, CacheConfig};
use core_config::database::DatabaseConfig;
use domain_pricing::{
    CostEstimator, InMemoryPricingCache, InMemoryPricingStore, PgPricingStore, PricingAccessor,
    PricingCache, PricingStore, RedisPricingCache, sample_pricing_documents,
};
use eyre::{Result, WrapErr, eyre};
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

use crate::config::{Config, StoreBackend, StoreConfig};

/// Everything `serve` and the one-shot commands need
pub struct Backends {
    pub estimator: CostEstimator,
    /// Held so it can be closed on shutdown
    pub db: Option<DatabaseConnection>,
}

impl Backends {
    pub async fn from_config(config: &Config) -> Result<Self> {
        let (store, db) = build_store(&config.store).await?;
        let mut accessor = PricingAccessor::new(store);

        if let Some(cache) = build_cache(&config.cache).await {
            accessor = accessor.with_cache(cache, config.cache.ttl);
        }
        info!(
            store = ?config.store.backend,
            cache = accessor.has_cache(),
            "Pricing accessor ready"
        );

        Ok(Self {
            estimator: CostEstimator::with_default_models(accessor),
            db,
        })
    }

    pub async fn close(self) {
        if let Some(db) = self.db {
            match db.close().await {
                Ok(_) => info!("PostgreSQL connection closed"),
                Err(e) => tracing::error!("Error closing PostgreSQL: {}", e),
            }
        }
    }
}

pub async fn connect_database(config: &DatabaseConfig) -> Result<DatabaseConnection> {
    let mut options = ConnectOptions::new(config.url.clone());
    options
        .max_connections(20)
        .min_connections(2)
        .connect_timeout(Duration::from_secs(8))
        .acquire_timeout(Duration::from_secs(8))
        .sqlx_logging(false);

    let db = Database::connect(options)
        .await
        .wrap_err("PostgreSQL connection failed")?;
    info!("Connected to PostgreSQL");
    Ok(db)
}

async fn build_store(
    config: &StoreConfig,
) -> Result<(Arc<dyn PricingStore>, Option<DatabaseConnection>)> {
    match config.backend {
        StoreBackend::Postgres => {
            let database = config
                .database
                .as_ref()
                .ok_or_else(|| eyre!("DATABASE_URL is required for the postgres store"))?;
            let db = connect_database(database).await?;
            Ok((Arc::new(PgPricingStore::new(db.clone())), Some(db)))
        }
        StoreBackend::File => {
            let path = config
                .data_file
                .as_ref()
                .ok_or_else(|| eyre!("PRICING_DATA_FILE is required for the file store"))?;
            let store = InMemoryPricingStore::from_json_file(path)?;
            info!(documents = store.len(), path = %path.display(), "Loaded pricing documents");
            Ok((Arc::new(store), None))
        }
        StoreBackend::Sample => {
            let store = InMemoryPricingStore::from_documents(sample_pricing_documents());
            info!(documents = store.len(), "Using sample pricing documents");
            Ok((Arc::new(store), None))
        }
    }
}

/// A cache that cannot be reached at startup is skipped; lookups go to the store.
async fn build_cache(config: &CacheConfig) -> Option<Arc<dyn PricingCache>> {
    match (config.backend, config.redis_url.as_deref()) {
        (CacheBackend::Redis, Some(url)) => match RedisPricingCache::connect(url).await {
            Ok(cache) => Some(Arc::new(cache)),
            Err(e) => {
                warn!(error = %e, "Redis unavailable, running without a pricing cache");
                None
            }
        },
        (CacheBackend::Redis, None) => {
            warn!("REDIS_HOST not set, running without a pricing cache");
            None
        }
        (CacheBackend::Memory, _) => Some(Arc::new(InMemoryPricingCache::new())),
        (CacheBackend::None, _) => None,
    }
}
