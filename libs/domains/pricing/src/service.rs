use futures::future::join_all;
use observability::{CalculationTimer, PricingMetrics};
use serde_json::Value;
use std::sync::Arc;
use std::time::Instant;
use tracing::{info, instrument, warn};

use crate::accessor::PricingAccessor;
use crate::error::PricingResult;
use crate::models::{
    BatchItemResult, BatchResult, CalculationRequest, CalculationResult, ServiceDescriptor,
};
use crate::registry::ModelRegistry;

/// Entry point for cost estimation: dispatches single calculations and batches
#[derive(Clone)]
pub struct CostEstimator {
    registry: Arc<ModelRegistry>,
    pricing: Arc<PricingAccessor>,
}

impl CostEstimator {
    pub fn new(registry: ModelRegistry, pricing: PricingAccessor) -> Self {
        Self {
            registry: Arc::new(registry),
            pricing: Arc::new(pricing),
        }
    }

    /// Estimator with every shipped cost model
    pub fn with_default_models(pricing: PricingAccessor) -> Self {
        Self::new(ModelRegistry::with_default_models(), pricing)
    }

    /// Estimate one service configuration
    #[instrument(skip(self, configuration))]
    pub async fn calculate(
        &self,
        service_code: &str,
        region: &str,
        configuration: Value,
    ) -> PricingResult<CalculationResult> {
        let model = self.registry.resolve(service_code)?;

        let timer = CalculationTimer::start(model.service_code());
        let result = model.calculate(&self.pricing, region, configuration).await;

        match &result {
            Ok(r) => {
                timer.finish("success");
                info!(monthly_cost = r.monthly_cost, "Cost calculated");
            }
            Err(e) if e.is_client_error() => {
                timer.finish(e.code());
                info!(error = %e, "Cost calculation rejected");
            }
            Err(e) => {
                timer.finish(e.code());
                warn!(error = %e, "Cost calculation failed");
            }
        }

        result
    }

    pub async fn calculate_request(
        &self,
        request: CalculationRequest,
    ) -> PricingResult<CalculationResult> {
        self.calculate(&request.service_code, &request.region, request.configuration)
            .await
    }

    /// Estimate several configurations concurrently.
    ///
    /// Results keep input order; a failing item is reported in place and
    /// excluded from the totals without affecting the others.
    #[instrument(skip_all, fields(items = requests.len()))]
    pub async fn calculate_batch(&self, requests: Vec<CalculationRequest>) -> BatchResult {
        let start = Instant::now();

        let items = join_all(requests.into_iter().map(|request| async move {
            let service_code = request.service_code.clone();
            match self.calculate_request(request).await {
                Ok(result) => BatchItemResult::success(&service_code, result),
                Err(e) => BatchItemResult::failure(&service_code, &e),
            }
        }))
        .await;

        let batch = BatchResult::from_items(items);
        PricingMetrics::record_batch(
            batch.items.len(),
            batch.failed,
            start.elapsed().as_secs_f64(),
        );
        batch
    }

    pub fn pricing(&self) -> &PricingAccessor {
        &self.pricing
    }

    pub fn is_supported(&self, service_code: &str) -> bool {
        self.registry.is_supported(service_code)
    }

    pub fn list_supported_services(&self) -> Vec<String> {
        self.registry.list_supported()
    }

    pub fn describe_supported_services(&self) -> Vec<ServiceDescriptor> {
        self.registry.describe_supported()
    }

    pub fn describe_service(&self, service_code: &str) -> PricingResult<ServiceDescriptor> {
        self.registry.describe(service_code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::{CacheError, InMemoryPricingCache, MockPricingCache};
    use crate::error::PricingError;
    use crate::repository::InMemoryPricingStore;
    use crate::sample_data::sample_pricing_documents;
    use serde_json::json;
    use std::time::Duration;

    fn sample_store() -> Arc<InMemoryPricingStore> {
        Arc::new(InMemoryPricingStore::from_documents(sample_pricing_documents()))
    }

    fn estimator() -> CostEstimator {
        CostEstimator::with_default_models(PricingAccessor::new(sample_store()))
    }

    fn ec2_request() -> Value {
        json!({"instanceType": "m5.large", "instanceCount": 2})
    }

    #[tokio::test]
    async fn test_calculate_ec2() {
        let result = estimator()
            .calculate("AmazonEC2", "us-east-1", ec2_request())
            .await
            .unwrap();
        assert_eq!(result.monthly_cost, 146.0);
        assert_eq!(result.annual_cost, 1752.0);
    }

    #[tokio::test]
    async fn test_service_code_is_case_insensitive() {
        let result = estimator()
            .calculate("amazonec2", "US-EAST-1", ec2_request())
            .await
            .unwrap();
        assert_eq!(result.monthly_cost, 146.0);
    }

    #[tokio::test]
    async fn test_unsupported_service() {
        let err = estimator()
            .calculate("AmazonQuantumLedger", "us-east-1", json!({}))
            .await
            .unwrap_err();
        assert!(matches!(err, PricingError::UnsupportedService(_)));
    }

    #[tokio::test]
    async fn test_unknown_instance_type() {
        let err = estimator()
            .calculate("AmazonEC2", "us-east-1", json!({"instanceType": "x9.mega"}))
            .await
            .unwrap_err();
        assert!(matches!(err, PricingError::RateNotFound { ref key, .. } if key == "x9.mega"));
    }

    #[tokio::test]
    async fn test_batch_isolates_failures_and_keeps_order() {
        let batch = estimator()
            .calculate_batch(vec![
                CalculationRequest::new("AmazonEC2", "us-east-1", ec2_request()),
                CalculationRequest::new("AmazonQuantumLedger", "us-east-1", json!({})),
                CalculationRequest::new("AmazonS3", "us-east-1", json!({"storageGb": 1000})),
            ])
            .await;

        assert_eq!(batch.items.len(), 3);
        assert_eq!(batch.items[0].service_code(), "AmazonEC2");
        assert_eq!(batch.items[1].service_code(), "AmazonQuantumLedger");
        assert_eq!(batch.items[2].service_code(), "AmazonS3");

        assert!(batch.items[0].is_success());
        assert_eq!(
            batch.items[1].error().map(|e| e.kind.as_str()),
            Some("unsupported_service")
        );
        assert!(batch.items[2].is_success());

        assert_eq!(batch.total_monthly_cost, 169.0);
        assert_eq!(batch.total_annual_cost, 2028.0);
        assert_eq!(batch.succeeded, 2);
        assert_eq!(batch.failed, 1);
    }

    #[tokio::test]
    async fn test_empty_batch() {
        let batch = estimator().calculate_batch(vec![]).await;
        assert!(batch.items.is_empty());
        assert_eq!(batch.total_monthly_cost, 0.0);
    }

    #[tokio::test]
    async fn test_cache_failure_matches_cache_hit_output() {
        let mut failing = MockPricingCache::new();
        failing
            .expect_get()
            .returning(|_| Err(CacheError::Unavailable("timeout".into())));
        failing
            .expect_set_with_expiry()
            .returning(|_, _, _| Err(CacheError::Unavailable("timeout".into())));

        let failing_estimator = CostEstimator::with_default_models(
            PricingAccessor::new(sample_store()).with_cache(Arc::new(failing), Duration::from_secs(60)),
        );

        let warm_cache = Arc::new(InMemoryPricingCache::new());
        let cached_estimator = CostEstimator::with_default_models(
            PricingAccessor::new(sample_store()).with_cache(warm_cache.clone(), Duration::from_secs(60)),
        );
        // First call populates the cache, second is served from it
        cached_estimator
            .calculate("AmazonEC2", "us-east-1", ec2_request())
            .await
            .unwrap();
        assert!(!warm_cache.is_empty());
        let from_cache = cached_estimator
            .calculate("AmazonEC2", "us-east-1", ec2_request())
            .await
            .unwrap();

        let from_store = failing_estimator
            .calculate("AmazonEC2", "us-east-1", ec2_request())
            .await
            .unwrap();

        assert_eq!(from_store, from_cache);
    }

    #[test]
    fn test_capability_discovery() {
        let estimator = estimator();
        assert!(estimator.is_supported("AWSLambda"));
        assert!(!estimator.is_supported("AmazonQuantumLedger"));
        assert_eq!(estimator.list_supported_services().len(), 20);
        assert_eq!(
            estimator.describe_service("awslambda").unwrap().name,
            "AWS Lambda"
        );
    }
}
