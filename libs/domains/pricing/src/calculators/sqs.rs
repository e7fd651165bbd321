//! Message queues.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use validator::Validate;

use super::transfer::TransferRates;
use crate::accessor::PricingAccessor;
use crate::error::PricingResult;
use crate::models::{CalculationResult, CostBreakdown, PriceTier};
use crate::normalize::{
    billable_after_free_tier, chunks, default_true, parse_configuration, per_million, rate_for,
};
use crate::registry::CostModel;
use crate::tiered::apply_tiered_pricing;

const SERVICE_CODE: &str = "AWSQueueService";

/// Payload size billed as one request
pub const REQUEST_CHUNK_KB: f64 = 64.0;

fn default_queue_type() -> String {
    "standard".to_string()
}

fn default_message_size_kb() -> f64 {
    REQUEST_CHUNK_KB
}

#[derive(Debug, Clone, Deserialize, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SqsConfiguration {
    /// `standard` or `fifo`. Default `standard`
    #[serde(default = "default_queue_type")]
    pub queue_type: String,
    /// API requests per month
    #[serde(default)]
    #[validate(range(min = 0.0))]
    pub requests: f64,
    /// Default 64
    #[serde(default = "default_message_size_kb")]
    #[validate(range(min = 0.0, max = 1024.0))]
    pub message_size_kb: f64,
    #[serde(default)]
    #[validate(range(min = 0.0))]
    pub data_transfer_out_gb: f64,
    #[serde(default = "default_true")]
    pub include_free_tier: bool,
}

/// `requests` category
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SqsRates {
    /// Per-million tiers per queue type, bounds in millions of requests
    pub queue_types: HashMap<String, Vec<PriceTier>>,
    pub free_requests: f64,
    #[serde(default)]
    pub data_transfer: TransferRates,
}

pub fn compute(config: &SqsConfiguration, rates: &SqsRates) -> PricingResult<CostBreakdown> {
    let tiers = rate_for(&rates.queue_types, &config.queue_type, SERVICE_CODE, "queue type")?;

    let billed_requests = config.requests * chunks(config.message_size_kb, REQUEST_CHUNK_KB);
    let free = if config.include_free_tier { rates.free_requests } else { 0.0 };
    let requests = apply_tiered_pricing(
        per_million(billable_after_free_tier(billed_requests, free)),
        tiers,
    );

    Ok(CostBreakdown::new()
        .with("requests", requests)
        .with(
            "dataTransfer",
            rates.data_transfer.egress_cost(config.data_transfer_out_gb),
        ))
}

pub struct SqsModel;

#[async_trait]
impl CostModel for SqsModel {
    fn service_code(&self) -> &'static str {
        SERVICE_CODE
    }

    fn name(&self) -> &'static str {
        "Amazon SQS"
    }

    async fn calculate(
        &self,
        pricing: &PricingAccessor,
        region: &str,
        configuration: Value,
    ) -> PricingResult<CalculationResult> {
        let config: SqsConfiguration = parse_configuration(SERVICE_CODE, configuration)?;
        let rates: SqsRates = pricing.rates(SERVICE_CODE, region, Some("requests")).await?;
        compute(&config, &rates).map(CalculationResult::from_breakdown)
    }
}
