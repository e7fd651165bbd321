//! Managed relational databases.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use validator::Validate;

use crate::accessor::PricingAccessor;
use crate::error::PricingResult;
use crate::models::{CalculationResult, CostBreakdown};
use crate::normalize::{billable_after_free_tier, default_hours, default_one, parse_configuration, rate_for};
use crate::registry::CostModel;

const SERVICE_CODE: &str = "AmazonRDS";

fn default_engine() -> String {
    "mysql".to_string()
}

fn default_deployment() -> String {
    "single-az".to_string()
}

fn default_storage_type() -> String {
    "gp3".to_string()
}

fn default_storage_gb() -> f64 {
    20.0
}

#[derive(Debug, Clone, Deserialize, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RdsConfiguration {
    pub instance_class: String,
    /// Default `mysql`
    #[serde(default = "default_engine")]
    pub engine: String,
    /// `single-az`, `multi-az` or `multi-az-cluster`. Default `single-az`
    #[serde(default = "default_deployment")]
    pub deployment: String,
    #[serde(default = "default_one")]
    pub instance_count: u32,
    #[serde(default = "default_hours")]
    #[validate(range(min = 0.0, max = 744.0))]
    pub hours_per_month: f64,
    /// Default `gp3`
    #[serde(default = "default_storage_type")]
    pub storage_type: String,
    /// Default 20
    #[serde(default = "default_storage_gb")]
    #[validate(range(min = 0.0))]
    pub storage_gb: f64,
    #[serde(default)]
    #[validate(range(min = 0.0))]
    pub provisioned_iops: f64,
    /// Backup storage; an amount equal to provisioned storage is free
    #[serde(default)]
    #[validate(range(min = 0.0))]
    pub backup_storage_gb: f64,
}

/// `compute` category
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RdsComputeRates {
    pub instance_classes: HashMap<String, f64>,
    /// License/engine multiplier on the hourly rate
    pub engines: HashMap<String, f64>,
    /// Applied to both instance and storage cost
    pub deployments: HashMap<String, f64>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RdsStorageTypeRate {
    pub price_per_gb_month: f64,
    #[serde(default)]
    pub included_iops: f64,
    #[serde(default)]
    pub price_per_iops: f64,
}

/// `storage` category
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RdsStorageRates {
    pub storage_types: HashMap<String, RdsStorageTypeRate>,
    pub backup_per_gb_month: f64,
}

pub fn compute(
    config: &RdsConfiguration,
    compute_rates: &RdsComputeRates,
    storage_rates: &RdsStorageRates,
) -> PricingResult<CostBreakdown> {
    let hourly = rate_for(
        &compute_rates.instance_classes,
        &config.instance_class,
        SERVICE_CODE,
        "instance class",
    )?;
    let engine = rate_for(&compute_rates.engines, &config.engine, SERVICE_CODE, "engine")?;
    let deployment = rate_for(
        &compute_rates.deployments,
        &config.deployment,
        SERVICE_CODE,
        "deployment",
    )?;
    let storage_type = rate_for(
        &storage_rates.storage_types,
        &config.storage_type,
        SERVICE_CODE,
        "storage type",
    )?;

    let instances = f64::from(config.instance_count);
    let compute = hourly * engine * deployment * config.hours_per_month * instances;
    let storage = config.storage_gb * storage_type.price_per_gb_month * deployment * instances;
    let iops = billable_after_free_tier(config.provisioned_iops, storage_type.included_iops)
        * storage_type.price_per_iops
        * deployment
        * instances;
    let backup = billable_after_free_tier(config.backup_storage_gb, config.storage_gb * instances)
        * storage_rates.backup_per_gb_month;

    Ok(CostBreakdown::new()
        .with("compute", compute)
        .with("storage", storage)
        .with("iops", iops)
        .with("backup", backup))
}

pub struct RdsModel;

#[async_trait]
impl CostModel for RdsModel {
    fn service_code(&self) -> &'static str {
        SERVICE_CODE
    }

    fn name(&self) -> &'static str {
        "Amazon RDS"
    }

    async fn calculate(
        &self,
        pricing: &PricingAccessor,
        region: &str,
        configuration: Value,
    ) -> PricingResult<CalculationResult> {
        let config: RdsConfiguration = parse_configuration(SERVICE_CODE, configuration)?;
        let compute_rates: RdsComputeRates = pricing.rates(SERVICE_CODE, region, Some("compute")).await?;
        let storage_rates: RdsStorageRates = pricing.rates(SERVICE_CODE, region, Some("storage")).await?;
        compute(&config, &compute_rates, &storage_rates).map(CalculationResult::from_breakdown)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculators::test_support::sample_accessor;
    use serde_json::json;

    fn compute_rates() -> RdsComputeRates {
        serde_json::from_value(json!({
            "instanceClasses": {"db.t3.medium": 0.068, "db.m5.large": 0.171},
            "engines": {"mysql": 1.0, "postgres": 1.06},
            "deployments": {"single-az": 1.0, "multi-az": 2.0}
        }))
        .unwrap()
    }

    fn storage_rates() -> RdsStorageRates {
        serde_json::from_value(json!({
            "storageTypes": {
                "gp3": {"pricePerGbMonth": 0.115},
                "io1": {"pricePerGbMonth": 0.125, "pricePerIops": 0.10}
            },
            "backupPerGbMonth": 0.095
        }))
        .unwrap()
    }

    fn config(value: Value) -> RdsConfiguration {
        parse_configuration(SERVICE_CODE, value).unwrap()
    }

    #[test]
    fn test_multi_az_doubles_instance_and_storage() {
        let single = compute(
            &config(json!({"instanceClass": "db.m5.large", "storageGb": 100})),
            &compute_rates(),
            &storage_rates(),
        )
        .unwrap();
        let multi = compute(
            &config(json!({"instanceClass": "db.m5.large", "storageGb": 100, "deployment": "multi-az"})),
            &compute_rates(),
            &storage_rates(),
        )
        .unwrap();

        assert_eq!(single.get("compute"), Some(124.83));
        assert_eq!(multi.get("compute"), Some(249.66));
        assert_eq!(single.get("storage"), Some(11.5));
        assert_eq!(multi.get("storage"), Some(23.0));
    }

    #[test]
    fn test_backup_allowance_equals_provisioned_storage() {
        let breakdown = compute(
            &config(json!({"instanceClass": "db.t3.medium", "storageGb": 100, "backupStorageGb": 150})),
            &compute_rates(),
            &storage_rates(),
        )
        .unwrap();
        assert_eq!(breakdown.get("backup"), Some(4.75));

        let within = compute(
            &config(json!({"instanceClass": "db.t3.medium", "storageGb": 100, "backupStorageGb": 80})),
            &compute_rates(),
            &storage_rates(),
        )
        .unwrap();
        assert_eq!(within.get("backup"), Some(0.0));
    }

    #[test]
    fn test_backup_allowance_scales_with_instance_count() {
        // 3 × 100 GB provisioned, so 250 GB of backup is free
        let covered = compute(
            &config(json!({
                "instanceClass": "db.t3.medium",
                "instanceCount": 3,
                "storageGb": 100,
                "backupStorageGb": 250
            })),
            &compute_rates(),
            &storage_rates(),
        )
        .unwrap();
        assert_eq!(covered.get("storage"), Some(34.5));
        assert_eq!(covered.get("backup"), Some(0.0));

        let beyond = compute(
            &config(json!({
                "instanceClass": "db.t3.medium",
                "instanceCount": 3,
                "storageGb": 100,
                "backupStorageGb": 350
            })),
            &compute_rates(),
            &storage_rates(),
        )
        .unwrap();
        assert_eq!(beyond.get("backup"), Some(4.75));
    }

    #[test]
    fn test_provisioned_iops() {
        let breakdown = compute(
            &config(json!({
                "instanceClass": "db.t3.medium",
                "storageType": "io1",
                "storageGb": 100,
                "provisionedIops": 1000
            })),
            &compute_rates(),
            &storage_rates(),
        )
        .unwrap();
        assert_eq!(breakdown.get("iops"), Some(100.0));
    }

    #[test]
    fn test_unknown_engine() {
        let err = compute(
            &config(json!({"instanceClass": "db.t3.medium", "engine": "db2"})),
            &compute_rates(),
            &storage_rates(),
        )
        .unwrap_err();
        assert_eq!(err.code(), "rate_not_found");
    }

    #[tokio::test]
    async fn test_with_sample_pricing() {
        let result = RdsModel
            .calculate(
                &sample_accessor(),
                "us-east-1",
                json!({"instanceClass": "db.t3.medium"}),
            )
            .await
            .unwrap();
        // 0.068 × 730 + 20 × 0.115
        assert_eq!(result.monthly_cost, 51.94);
    }
}
