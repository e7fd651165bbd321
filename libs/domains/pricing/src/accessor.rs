use observability::PricingMetrics;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, instrument, warn};

use crate::cache::PricingCache;
use crate::error::{PricingError, PricingResult};
use crate::models::{PricingDocument, PricingKey};
use crate::repository::PricingStore;

/// Cache entry lifetime when none is configured
pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(3600);

/// Resolves pricing documents: cache first, durable store on miss, then
/// repopulates the cache.
///
/// Cache failures never reach the caller; they are logged and the lookup
/// continues against the store.
#[derive(Clone)]
pub struct PricingAccessor {
    store: Arc<dyn PricingStore>,
    cache: Option<Arc<dyn PricingCache>>,
    ttl: Duration,
}

impl PricingAccessor {
    /// Accessor without a cache
    pub fn new(store: Arc<dyn PricingStore>) -> Self {
        Self {
            store,
            cache: None,
            ttl: DEFAULT_CACHE_TTL,
        }
    }

    pub fn with_cache(mut self, cache: Arc<dyn PricingCache>, ttl: Duration) -> Self {
        self.cache = Some(cache);
        self.ttl = ttl;
        self
    }

    pub fn has_cache(&self) -> bool {
        self.cache.is_some()
    }

    /// Fetch the latest pricing document for a service in a region.
    ///
    /// Without a category, documents of any category match.
    #[instrument(skip(self), fields(cache = self.cache.is_some()))]
    pub async fn get(
        &self,
        service_code: &str,
        region: &str,
        category: Option<&str>,
    ) -> PricingResult<PricingDocument> {
        let key = PricingKey::new(service_code, region, category);
        let cache_key = key.cache_key();

        if let Some(cache) = &self.cache {
            match cache.get(&cache_key).await {
                Ok(Some(document)) => {
                    PricingMetrics::record_cache_hit();
                    debug!(key = %cache_key, "Pricing cache hit");
                    return Ok(document);
                }
                Ok(None) => PricingMetrics::record_cache_miss(),
                Err(e) => {
                    PricingMetrics::record_cache_error();
                    warn!(key = %cache_key, error = %e, "Pricing cache read failed, falling back to store");
                }
            }
        }

        let document = self.store.latest(&key).await?;
        PricingMetrics::record_store_lookup(service_code, document.is_some());

        let document = document.ok_or_else(|| PricingError::PricingNotFound {
            service_code: key.service_code.clone(),
            region: key.region.clone(),
            category: key.category.clone(),
        })?;

        if let Some(cache) = &self.cache {
            let written = cache.set_with_expiry(&cache_key, &document, self.ttl).await;
            PricingMetrics::record_cache_write(written.is_ok());
            if let Err(e) = written {
                warn!(key = %cache_key, error = %e, "Pricing cache write failed");
            }
        }

        Ok(document)
    }

    /// Fetch a document and decode its rate table
    pub async fn rates<T: DeserializeOwned>(
        &self,
        service_code: &str,
        region: &str,
        category: Option<&str>,
    ) -> PricingResult<T> {
        self.get(service_code, region, category).await?.rates()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::{CacheError, InMemoryPricingCache, MockPricingCache};
    use crate::repository::{InMemoryPricingStore, MockPricingStore};
    use chrono::Utc;
    use mockall::predicate::function;
    use serde_json::json;

    fn document() -> PricingDocument {
        PricingDocument::new("AWSLambda", "us-east-1", Some("compute"), Utc::now(), json!({"x": 1}))
    }

    #[tokio::test]
    async fn test_cache_hit_skips_store() {
        let doc = document();
        let cached = doc.clone();

        let mut cache = MockPricingCache::new();
        cache
            .expect_get()
            .with(function(|key: &str| key == "pricing:AWSLambda:us-east-1:compute"))
            .times(1)
            .returning(move |_| Ok(Some(cached.clone())));

        let mut store = MockPricingStore::new();
        store.expect_latest().never();

        let accessor = PricingAccessor::new(Arc::new(store))
            .with_cache(Arc::new(cache), DEFAULT_CACHE_TTL);

        let found = accessor.get("AWSLambda", "US-EAST-1", Some("compute")).await.unwrap();
        assert_eq!(found, doc);
    }

    #[tokio::test]
    async fn test_cache_error_falls_through_to_store() {
        let doc = document();
        let stored = doc.clone();

        let mut cache = MockPricingCache::new();
        cache
            .expect_get()
            .returning(|_| Err(CacheError::Unavailable("connection refused".into())));
        cache
            .expect_set_with_expiry()
            .times(1)
            .returning(|_, _, _| Err(CacheError::Unavailable("connection refused".into())));

        let mut store = MockPricingStore::new();
        store
            .expect_latest()
            .times(1)
            .returning(move |_| Ok(Some(stored.clone())));

        let accessor = PricingAccessor::new(Arc::new(store))
            .with_cache(Arc::new(cache), DEFAULT_CACHE_TTL);

        let found = accessor.get("AWSLambda", "us-east-1", Some("compute")).await.unwrap();
        assert_eq!(found, doc);
    }

    #[tokio::test]
    async fn test_miss_repopulates_cache() {
        let store = Arc::new(InMemoryPricingStore::from_documents(vec![document()]));
        let cache = Arc::new(InMemoryPricingCache::new());
        let accessor = PricingAccessor::new(store).with_cache(cache.clone(), DEFAULT_CACHE_TTL);

        accessor.get("AWSLambda", "us-east-1", Some("compute")).await.unwrap();

        assert!(
            cache
                .get("pricing:AWSLambda:us-east-1:compute")
                .await
                .unwrap()
                .is_some()
        );
    }

    #[tokio::test]
    async fn test_missing_document_is_pricing_not_found() {
        let mut store = MockPricingStore::new();
        store.expect_latest().returning(|_| Ok(None));

        let accessor = PricingAccessor::new(Arc::new(store));
        let err = accessor.get("AmazonEC2", "eu-west-3", None).await.unwrap_err();

        match err {
            PricingError::PricingNotFound {
                service_code,
                region,
                category,
            } => {
                assert_eq!(service_code, "AmazonEC2");
                assert_eq!(region, "eu-west-3");
                assert!(category.is_none());
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_store_error_propagates() {
        let mut store = MockPricingStore::new();
        store
            .expect_latest()
            .returning(|_| Err(PricingError::Internal("store down".into())));

        let accessor = PricingAccessor::new(Arc::new(store));
        let err = accessor.get("AmazonEC2", "us-east-1", None).await.unwrap_err();
        assert_eq!(err.code(), "internal_error");
    }
}
