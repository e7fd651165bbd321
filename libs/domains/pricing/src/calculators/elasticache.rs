//! In-memory caches.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use validator::Validate;

use crate::accessor::PricingAccessor;
use crate::error::PricingResult;
use crate::models::{CalculationResult, CostBreakdown};
use crate::normalize::{default_hours, default_one, parse_configuration, rate_for};
use crate::registry::CostModel;

const SERVICE_CODE: &str = "AmazonElastiCache";

fn default_engine() -> String {
    "redis".to_string()
}

#[derive(Debug, Clone, Deserialize, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ElastiCacheConfiguration {
    pub node_type: String,
    /// `redis`, `valkey` or `memcached`. Default `redis`
    #[serde(default = "default_engine")]
    pub engine: String,
    #[serde(default = "default_one")]
    #[validate(range(min = 1))]
    pub shards: u32,
    #[serde(default)]
    #[validate(range(max = 5))]
    pub replicas_per_shard: u32,
    #[serde(default = "default_hours")]
    #[validate(range(min = 0.0, max = 744.0))]
    pub hours_per_month: f64,
    #[serde(default)]
    #[validate(range(min = 0.0))]
    pub backup_storage_gb: f64,
}

/// `cache` category
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ElastiCacheRates {
    pub node_types: HashMap<String, f64>,
    /// Fraction off the node price per engine
    pub engine_discounts: HashMap<String, f64>,
    pub backup_per_gb_month: f64,
}

pub fn compute(
    config: &ElastiCacheConfiguration,
    rates: &ElastiCacheRates,
) -> PricingResult<CostBreakdown> {
    let hourly = rate_for(&rates.node_types, &config.node_type, SERVICE_CODE, "node type")?;
    let discount = rate_for(&rates.engine_discounts, &config.engine, SERVICE_CODE, "engine")?;

    let nodes = f64::from(config.shards) * (1.0 + f64::from(config.replicas_per_shard));

    Ok(CostBreakdown::new()
        .with("nodes", hourly * nodes * config.hours_per_month * (1.0 - discount))
        .with("backup", config.backup_storage_gb * rates.backup_per_gb_month))
}

pub struct ElastiCacheModel;

#[async_trait]
impl CostModel for ElastiCacheModel {
    fn service_code(&self) -> &'static str {
        SERVICE_CODE
    }

    fn name(&self) -> &'static str {
        "Amazon ElastiCache"
    }

    async fn calculate(
        &self,
        pricing: &PricingAccessor,
        region: &str,
        configuration: Value,
    ) -> PricingResult<CalculationResult> {
        let config: ElastiCacheConfiguration = parse_configuration(SERVICE_CODE, configuration)?;
        let rates: ElastiCacheRates = pricing.rates(SERVICE_CODE, region, Some("cache")).await?;
        compute(&config, &rates).map(CalculationResult::from_breakdown)
    }
}
