//! Function-as-a-service.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use validator::Validate;

use super::Rate;
use crate::accessor::PricingAccessor;
use crate::error::PricingResult;
use crate::models::{CalculationResult, CostBreakdown};
use crate::normalize::{
    billable_after_free_tier, default_true, mb_to_gb, ms_to_seconds, parse_configuration,
    per_million, rate_for,
};
use crate::registry::CostModel;

const SERVICE_CODE: &str = "AWSLambda";

/// Ephemeral storage included with every function
pub const INCLUDED_EPHEMERAL_MB: f64 = 512.0;

fn default_memory_mb() -> f64 {
    128.0
}

fn default_duration_ms() -> f64 {
    100.0
}

fn default_architecture() -> String {
    "x86_64".to_string()
}

fn default_ephemeral_mb() -> f64 {
    INCLUDED_EPHEMERAL_MB
}

#[derive(Debug, Clone, Deserialize, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct LambdaConfiguration {
    /// Monthly invocations
    #[serde(default)]
    #[validate(range(min = 0.0))]
    pub invocations: f64,
    /// Default 128
    #[serde(default = "default_memory_mb")]
    #[validate(range(min = 128.0, max = 10240.0))]
    pub memory_mb: f64,
    /// Average billed duration. Default 100
    #[serde(default = "default_duration_ms")]
    #[validate(range(min = 0.0, max = 900000.0))]
    pub duration_ms: f64,
    /// `x86_64` or `arm64`. Default `x86_64`
    #[serde(default = "default_architecture")]
    pub architecture: String,
    /// Default 512 (included)
    #[serde(default = "default_ephemeral_mb")]
    #[validate(range(min = 512.0, max = 10240.0))]
    pub ephemeral_storage_mb: f64,
    /// Deduct the monthly free tier. Default true
    #[serde(default = "default_true")]
    pub include_free_tier: bool,
}

/// `compute` category
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LambdaRates {
    /// Per GB-second, flat or tiered by monthly GB-seconds
    pub architectures: HashMap<String, Rate>,
    pub price_per_million_requests: f64,
    pub ephemeral_storage_per_gb_second: f64,
    pub free_gb_seconds: f64,
    pub free_requests: f64,
}

pub fn compute(config: &LambdaConfiguration, rates: &LambdaRates) -> PricingResult<CostBreakdown> {
    let duration_rate = rate_for(&rates.architectures, &config.architecture, SERVICE_CODE, "architecture")?;

    let billed_seconds = ms_to_seconds(config.duration_ms) * config.invocations;
    let gb_seconds = mb_to_gb(config.memory_mb) * billed_seconds;

    let (free_gb_seconds, free_requests) = if config.include_free_tier {
        (rates.free_gb_seconds, rates.free_requests)
    } else {
        (0.0, 0.0)
    };

    let compute = duration_rate.cost(billable_after_free_tier(gb_seconds, free_gb_seconds));
    let requests = per_million(billable_after_free_tier(config.invocations, free_requests))
        * rates.price_per_million_requests;

    let extra_ephemeral_gb = mb_to_gb(billable_after_free_tier(
        config.ephemeral_storage_mb,
        INCLUDED_EPHEMERAL_MB,
    ));
    let ephemeral = extra_ephemeral_gb * billed_seconds * rates.ephemeral_storage_per_gb_second;

    Ok(CostBreakdown::new()
        .with("compute", compute)
        .with("requests", requests)
        .with("ephemeralStorage", ephemeral))
}

pub struct LambdaModel;

#[async_trait]
impl CostModel for LambdaModel {
    fn service_code(&self) -> &'static str {
        SERVICE_CODE
    }

    fn name(&self) -> &'static str {
        "AWS Lambda"
    }

    async fn calculate(
        &self,
        pricing: &PricingAccessor,
        region: &str,
        configuration: Value,
    ) -> PricingResult<CalculationResult> {
        let config: LambdaConfiguration = parse_configuration(SERVICE_CODE, configuration)?;
        let rates: LambdaRates = pricing.rates(SERVICE_CODE, region, Some("compute")).await?;
        compute(&config, &rates).map(CalculationResult::from_breakdown)
    }
}
