//! Pub/sub notifications.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};
use validator::Validate;

use crate::accessor::PricingAccessor;
use crate::error::PricingResult;
use crate::models::{CalculationResult, CostBreakdown};
use crate::normalize::{
    billable_after_free_tier, chunks, default_true, parse_configuration, per_million, rate_for,
};
use crate::registry::CostModel;

const SERVICE_CODE: &str = "AmazonSNS";

/// Payload size billed as one publish
pub const PUBLISH_CHUNK_KB: f64 = 64.0;

fn default_message_size_kb() -> f64 {
    PUBLISH_CHUNK_KB
}

#[derive(Debug, Clone, Deserialize, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SnsConfiguration {
    #[serde(default)]
    #[validate(range(min = 0.0))]
    pub publishes: f64,
    /// Default 64
    #[serde(default = "default_message_size_kb")]
    #[validate(range(min = 0.0, max = 256.0))]
    pub message_size_kb: f64,
    /// Monthly deliveries per protocol (`http`, `email`, `sqs`, `lambda`, ...)
    #[serde(default)]
    pub deliveries: BTreeMap<String, f64>,
    #[serde(default)]
    #[validate(range(min = 0.0))]
    pub sms_messages: f64,
    #[serde(default = "default_true")]
    pub include_free_tier: bool,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProtocolRate {
    pub price_per_million: f64,
    #[serde(default)]
    pub free_deliveries: f64,
}

/// `requests` category
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SnsRates {
    pub publish_per_million: f64,
    pub free_publishes: f64,
    pub protocols: HashMap<String, ProtocolRate>,
    pub sms_per_message: f64,
}

pub fn compute(config: &SnsConfiguration, rates: &SnsRates) -> PricingResult<CostBreakdown> {
    let free_tier = config.include_free_tier;

    let billed_publishes = config.publishes * chunks(config.message_size_kb, PUBLISH_CHUNK_KB);
    let free_publishes = if free_tier { rates.free_publishes } else { 0.0 };
    let publishes =
        per_million(billable_after_free_tier(billed_publishes, free_publishes)) * rates.publish_per_million;

    let mut deliveries = 0.0;
    for (protocol, count) in &config.deliveries {
        let rate = rate_for(&rates.protocols, protocol, SERVICE_CODE, "protocol")?;
        let free = if free_tier { rate.free_deliveries } else { 0.0 };
        deliveries += per_million(billable_after_free_tier(*count, free)) * rate.price_per_million;
    }

    Ok(CostBreakdown::new()
        .with("publishes", publishes)
        .with("deliveries", deliveries)
        .with("sms", config.sms_messages * rates.sms_per_message))
}

pub struct SnsModel;

#[async_trait]
impl CostModel for SnsModel {
    fn service_code(&self) -> &'static str {
        SERVICE_CODE
    }

    fn name(&self) -> &'static str {
        "Amazon SNS"
    }

    async fn calculate(
        &self,
        pricing: &PricingAccessor,
        region: &str,
        configuration: Value,
    ) -> PricingResult<CalculationResult> {
        let config: SnsConfiguration = parse_configuration(SERVICE_CODE, configuration)?;
        let rates: SnsRates = pricing.rates(SERVICE_CODE, region, Some("requests")).await?;
        compute(&config, &rates).map(CalculationResult::from_breakdown)
    }
}
