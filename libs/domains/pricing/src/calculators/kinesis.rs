//! Data streams.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use validator::Validate;

use crate::accessor::PricingAccessor;
use crate::error::PricingResult;
use crate::models::{CalculationResult, CostBreakdown};
use crate::normalize::{chunks, default_hours, parse_configuration, per_million};
use crate::registry::CostModel;

const SERVICE_CODE: &str = "AmazonKinesis";

/// Record size billed as one PUT payload unit
pub const PAYLOAD_UNIT_KB: f64 = 25.0;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum StreamCapacityMode {
    #[default]
    Provisioned,
    OnDemand,
}

fn default_shards() -> f64 {
    1.0
}

fn default_streams() -> f64 {
    1.0
}

fn default_record_kb() -> f64 {
    1.0
}

#[derive(Debug, Clone, Deserialize, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct KinesisConfiguration {
    #[serde(default)]
    pub capacity_mode: StreamCapacityMode,
    /// Provisioned mode. Default 1
    #[serde(default = "default_shards")]
    #[validate(range(min = 0.0))]
    pub shards: f64,
    /// Provisioned mode: average records written per second
    #[serde(default)]
    #[validate(range(min = 0.0))]
    pub records_per_second: f64,
    /// Default 1
    #[serde(default = "default_record_kb")]
    #[validate(range(min = 0.0, max = 1024.0))]
    pub average_record_kb: f64,
    /// Provisioned mode: retention beyond 24 hours
    #[serde(default)]
    pub extended_retention: bool,
    /// On-demand mode. Default 1
    #[serde(default = "default_streams")]
    #[validate(range(min = 0.0))]
    pub streams: f64,
    #[serde(default)]
    #[validate(range(min = 0.0))]
    pub ingest_gb: f64,
    #[serde(default)]
    #[validate(range(min = 0.0))]
    pub retrieval_gb: f64,
    #[serde(default = "default_hours")]
    #[validate(range(min = 0.0, max = 744.0))]
    pub hours_per_month: f64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProvisionedStreamRates {
    pub shard_hour: f64,
    pub put_payload_units_per_million: f64,
    pub extended_retention_shard_hour: f64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OnDemandStreamRates {
    pub stream_hour: f64,
    pub ingest_per_gb: f64,
    pub retrieval_per_gb: f64,
}

/// `streams` category
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct KinesisRates {
    pub provisioned: ProvisionedStreamRates,
    pub on_demand: OnDemandStreamRates,
}

pub fn compute(config: &KinesisConfiguration, rates: &KinesisRates) -> CostBreakdown {
    let hours = config.hours_per_month;

    match config.capacity_mode {
        StreamCapacityMode::Provisioned => {
            let p = &rates.provisioned;
            let records = config.records_per_second * hours * 3600.0;
            let payload_units = records * chunks(config.average_record_kb, PAYLOAD_UNIT_KB);
            let retention = if config.extended_retention {
                config.shards * hours * p.extended_retention_shard_hour
            } else {
                0.0
            };

            CostBreakdown::new()
                .with("shards", config.shards * hours * p.shard_hour)
                .with(
                    "putPayloadUnits",
                    per_million(payload_units) * p.put_payload_units_per_million,
                )
                .with("extendedRetention", retention)
        }
        StreamCapacityMode::OnDemand => {
            let o = &rates.on_demand;
            CostBreakdown::new()
                .with("streams", config.streams * hours * o.stream_hour)
                .with("ingest", config.ingest_gb * o.ingest_per_gb)
                .with("retrieval", config.retrieval_gb * o.retrieval_per_gb)
        }
    }
}

pub struct KinesisModel;

#[async_trait]
impl CostModel for KinesisModel {
    fn service_code(&self) -> &'static str {
        SERVICE_CODE
    }

    fn name(&self) -> &'static str {
        "Amazon Kinesis Data Streams"
    }

    async fn calculate(
        &self,
        pricing: &PricingAccessor,
        region: &str,
        configuration: Value,
    ) -> PricingResult<CalculationResult> {
        let config: KinesisConfiguration = parse_configuration(SERVICE_CODE, configuration)?;
        let rates: KinesisRates = pricing.rates(SERVICE_CODE, region, Some("streams")).await?;
        Ok(CalculationResult::from_breakdown(compute(&config, &rates)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculators::test_support::sample_accessor;
    use serde_json::json;

    async fn calculate(configuration: Value) -> CalculationResult {
        KinesisModel
            .calculate(&sample_accessor(), "us-east-1", configuration)
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_provisioned_shards_and_payload_units() {
        // 100 rec/s × 2,628,000 s × 2 units (30 KB)
        let result = calculate(json!({
            "shards": 2,
            "recordsPerSecond": 100,
            "averageRecordKb": 30
        }))
        .await;
        assert_eq!(result.cost_breakdown.get("shards"), Some(21.9));
        assert_eq!(result.cost_breakdown.get("putPayloadUnits"), Some(7.36));
        assert_eq!(result.cost_breakdown.get("extendedRetention"), Some(0.0));
    }

    #[tokio::test]
    async fn test_extended_retention() {
        let result = calculate(json!({"shards": 2, "extendedRetention": true})).await;
        assert_eq!(result.cost_breakdown.get("extendedRetention"), Some(29.2));
    }

    #[tokio::test]
    async fn test_on_demand_mode() {
        let result = calculate(json!({
            "capacityMode": "on-demand",
            "ingestGb": 100,
            "retrievalGb": 200
        }))
        .await;
        assert_eq!(result.cost_breakdown.get("streams"), Some(29.2));
        assert_eq!(result.cost_breakdown.get("ingest"), Some(8.0));
        assert_eq!(result.cost_breakdown.get("retrieval"), Some(8.0));
        assert!(result.cost_breakdown.get("shards").is_none());
    }
}
