//! Managed NoSQL tables.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use validator::Validate;

use crate::accessor::PricingAccessor;
use crate::error::PricingResult;
use crate::models::{CalculationResult, CostBreakdown};
use crate::normalize::{
    HOURS_PER_MONTH, billable_after_free_tier, default_true, parse_configuration, per_million,
    rate_for,
};
use crate::registry::CostModel;

const SERVICE_CODE: &str = "AmazonDynamoDB";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum CapacityMode {
    #[default]
    OnDemand,
    Provisioned,
}

fn default_table_class() -> String {
    "standard".to_string()
}

#[derive(Debug, Clone, Deserialize, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct DynamoDbConfiguration {
    /// `on-demand` or `provisioned`. Default `on-demand`
    #[serde(default)]
    pub capacity_mode: CapacityMode,
    /// `standard` or `standard-ia`
    #[serde(default = "default_table_class")]
    pub table_class: String,
    /// On-demand read request units per month
    #[serde(default)]
    #[validate(range(min = 0.0))]
    pub read_request_units: f64,
    #[serde(default)]
    #[validate(range(min = 0.0))]
    pub write_request_units: f64,
    /// Provisioned read capacity units, held all month
    #[serde(default)]
    #[validate(range(min = 0.0))]
    pub read_capacity_units: f64,
    #[serde(default)]
    #[validate(range(min = 0.0))]
    pub write_capacity_units: f64,
    #[serde(default)]
    #[validate(range(min = 0.0))]
    pub storage_gb: f64,
    #[serde(default)]
    #[validate(range(min = 0.0))]
    pub backup_gb: f64,
    #[serde(default = "default_true")]
    pub include_free_tier: bool,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TableClassRate {
    pub read_per_million: f64,
    pub write_per_million: f64,
    pub rcu_hour: f64,
    pub wcu_hour: f64,
    pub storage_per_gb_month: f64,
}

/// `database` category
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DynamoDbRates {
    pub table_classes: HashMap<String, TableClassRate>,
    pub free_rcu: f64,
    pub free_wcu: f64,
    pub free_storage_gb: f64,
    pub backup_per_gb_month: f64,
}

pub fn compute(config: &DynamoDbConfiguration, rates: &DynamoDbRates) -> PricingResult<CostBreakdown> {
    let class = rate_for(&rates.table_classes, &config.table_class, SERVICE_CODE, "table class")?;

    let (free_rcu, free_wcu, free_storage) = if config.include_free_tier {
        (rates.free_rcu, rates.free_wcu, rates.free_storage_gb)
    } else {
        (0.0, 0.0, 0.0)
    };

    let (reads, writes) = match config.capacity_mode {
        CapacityMode::OnDemand => (
            per_million(config.read_request_units) * class.read_per_million,
            per_million(config.write_request_units) * class.write_per_million,
        ),
        CapacityMode::Provisioned => (
            billable_after_free_tier(config.read_capacity_units, free_rcu) * class.rcu_hour * HOURS_PER_MONTH,
            billable_after_free_tier(config.write_capacity_units, free_wcu) * class.wcu_hour * HOURS_PER_MONTH,
        ),
    };

    Ok(CostBreakdown::new()
        .with("readCapacity", reads)
        .with("writeCapacity", writes)
        .with(
            "storage",
            billable_after_free_tier(config.storage_gb, free_storage) * class.storage_per_gb_month,
        )
        .with("backup", config.backup_gb * rates.backup_per_gb_month))
}

pub struct DynamoDbModel;

#[async_trait]
impl CostModel for DynamoDbModel {
    fn service_code(&self) -> &'static str {
        SERVICE_CODE
    }

    fn name(&self) -> &'static str {
        "Amazon DynamoDB"
    }

    async fn calculate(
        &self,
        pricing: &PricingAccessor,
        region: &str,
        configuration: Value,
    ) -> PricingResult<CalculationResult> {
        let config: DynamoDbConfiguration = parse_configuration(SERVICE_CODE, configuration)?;
        let rates: DynamoDbRates = pricing.rates(SERVICE_CODE, region, Some("database")).await?;
        compute(&config, &rates).map(CalculationResult::from_breakdown)
    }
}
