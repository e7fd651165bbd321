//! Monitoring: metrics, dashboards, alarms and logs.

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

const SERVICE_CODE: &str = "AmazonCloudWatch";

#[derive(Debug, Clone, Deserialize, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CloudWatchConfiguration {
    #[serde(default)]
    #[validate(range(min = 0.0))]
    pub custom_metrics: f64,
    #[serde(default)]
    #[validate(range(min = 0.0))]
    pub dashboards: f64,
    #[serde(default)]
    #[validate(range(min = 0.0))]
    pub standard_alarms: f64,
    #[serde(default)]
    #[validate(range(min = 0.0))]
    pub high_resolution_alarms: f64,
    #[serde(default)]
    #[validate(range(min = 0.0))]
    pub logs_ingested_gb: f64,
    #[serde(default)]
    #[validate(range(min = 0.0))]
    pub logs_stored_gb: f64,
    #[serde(default)]
    #[validate(range(min = 0.0))]
    pub api_requests: f64,
    #[serde(default = "default_true")]
    pub include_free_tier: bool,
}

/// `monitoring` category
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CloudWatchRates {
    pub metric_tiers: Vec<PriceTier>,
    pub free_metrics: f64,
    pub dashboard_per_month: f64,
    pub free_dashboards: f64,
    pub standard_alarm_per_month: f64,
    pub high_resolution_alarm_per_month: f64,
    /// Applies to standard alarms only
    pub free_alarms: f64,
    pub logs_ingestion_per_gb: f64,
    pub logs_storage_per_gb_month: f64,
    /// Applies separately to ingestion and storage
    pub free_logs_gb: f64,
    pub api_per_1000: f64,
    pub free_api_requests: f64,
}

impl CloudWatchRates {
    fn without_free_tier(&self) -> Self {
        Self {
            free_metrics: 0.0,
            free_dashboards: 0.0,
            free_alarms: 0.0,
            free_logs_gb: 0.0,
            free_api_requests: 0.0,
            ..self.clone()
        }
    }
}

pub fn compute(config: &CloudWatchConfiguration, rates: &CloudWatchRates) -> CostBreakdown {
    let without_free;
    let rates = if config.include_free_tier {
        rates
    } else {
        without_free = rates.without_free_tier();
        &without_free
    };

    let metrics = apply_tiered_pricing(
        billable_after_free_tier(config.custom_metrics, rates.free_metrics),
        &rates.metric_tiers,
    );
    let dashboards =
        billable_after_free_tier(config.dashboards, rates.free_dashboards) * rates.dashboard_per_month;
    let alarms = billable_after_free_tier(config.standard_alarms, rates.free_alarms)
        * rates.standard_alarm_per_month
        + config.high_resolution_alarms * rates.high_resolution_alarm_per_month;
    let logs = billable_after_free_tier(config.logs_ingested_gb, rates.free_logs_gb)
        * rates.logs_ingestion_per_gb
        + billable_after_free_tier(config.logs_stored_gb, rates.free_logs_gb)
            * rates.logs_storage_per_gb_month;
    let api = billable_after_free_tier(config.api_requests, rates.free_api_requests) / 1000.0
        * rates.api_per_1000;

    CostBreakdown::new()
        .with("metrics", metrics)
        .with("dashboards", dashboards)
        .with("alarms", alarms)
        .with("logs", logs)
        .with("api", api)
}

pub struct CloudWatchModel;

#[async_trait]
impl CostModel for CloudWatchModel {
    fn service_code(&self) -> &'static str {
        SERVICE_CODE
    }

    fn name(&self) -> &'static str {
        "Amazon CloudWatch"
    }

    async fn calculate(
        &self,
        pricing: &PricingAccessor,
        region: &str,
        configuration: Value,
    ) -> PricingResult<CalculationResult> {
        let config: CloudWatchConfiguration = parse_configuration(SERVICE_CODE, configuration)?;
        let rates: CloudWatchRates = pricing.rates(SERVICE_CODE, region, Some("monitoring")).await?;
        Ok(CalculationResult::from_breakdown(compute(&config, &rates)))
    }
}
