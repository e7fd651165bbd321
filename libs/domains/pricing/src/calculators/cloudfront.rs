//! Content delivery network.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use validator::Validate;

use crate::accessor::PricingAccessor;
use crate::error::PricingResult;
use crate::models::{CalculationResult, CostBreakdown, PriceTier};
use crate::normalize::{billable_after_free_tier, default_true, parse_configuration};
use crate::registry::CostModel;
use crate::tiered::apply_tiered_pricing;

const SERVICE_CODE: &str = "AmazonCloudFront";

#[derive(Debug, Clone, Deserialize, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CloudFrontConfiguration {
    #[serde(default)]
    #[validate(range(min = 0.0))]
    pub data_transfer_out_gb: f64,
    #[serde(default)]
    #[validate(range(min = 0.0))]
    pub http_requests: f64,
    #[serde(default)]
    #[validate(range(min = 0.0))]
    pub https_requests: f64,
    #[serde(default)]
    #[validate(range(min = 0.0))]
    pub invalidation_paths: f64,
    #[serde(default = "default_true")]
    pub include_free_tier: bool,
}

/// `data-transfer` category
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CloudFrontRates {
    pub transfer_tiers: Vec<PriceTier>,
    pub free_transfer_gb: f64,
    pub http_per_10k: f64,
    pub https_per_10k: f64,
    /// Shared between HTTP and HTTPS, HTTP consumed first
    pub free_requests: f64,
    pub free_invalidation_paths: f64,
    pub invalidation_per_path: f64,
}

pub fn compute(config: &CloudFrontConfiguration, rates: &CloudFrontRates) -> CostBreakdown {
    let (free_gb, free_requests) = if config.include_free_tier {
        (rates.free_transfer_gb, rates.free_requests)
    } else {
        (0.0, 0.0)
    };

    let transfer = apply_tiered_pricing(
        billable_after_free_tier(config.data_transfer_out_gb, free_gb),
        &rates.transfer_tiers,
    );

    let billable_http = billable_after_free_tier(config.http_requests, free_requests);
    let remaining_free = billable_after_free_tier(free_requests, config.http_requests);
    let billable_https = billable_after_free_tier(config.https_requests, remaining_free);
    let requests =
        billable_http / 10_000.0 * rates.http_per_10k + billable_https / 10_000.0 * rates.https_per_10k;

    let invalidations = billable_after_free_tier(config.invalidation_paths, rates.free_invalidation_paths)
        * rates.invalidation_per_path;

    CostBreakdown::new()
        .with("dataTransfer", transfer)
        .with("requests", requests)
        .with("invalidations", invalidations)
}

pub struct CloudFrontModel;

#[async_trait]
impl CostModel for CloudFrontModel {
    fn service_code(&self) -> &'static str {
        SERVICE_CODE
    }

    fn name(&self) -> &'static str {
        "Amazon CloudFront"
    }

    async fn calculate(
        &self,
        pricing: &PricingAccessor,
        region: &str,
        configuration: Value,
    ) -> PricingResult<CalculationResult> {
        let config: CloudFrontConfiguration = parse_configuration(SERVICE_CODE, configuration)?;
        let rates: CloudFrontRates = pricing
            .rates(SERVICE_CODE, region, Some("data-transfer"))
            .await?;
        Ok(CalculationResult::from_breakdown(compute(&config, &rates)))
    }
}
