//! Serverless containers (Fargate launch type).

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use validator::Validate;

use crate::accessor::PricingAccessor;
use crate::error::PricingResult;
use crate::models::{CalculationResult, CostBreakdown};
use crate::normalize::{billable_after_free_tier, default_hours, parse_configuration, rate_for};
use crate::registry::CostModel;

const SERVICE_CODE: &str = "AmazonECS";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OperatingSystem {
    #[default]
    Linux,
    Windows,
}

fn default_tasks() -> f64 {
    1.0
}

fn default_vcpu() -> f64 {
    0.25
}

fn default_memory_gb() -> f64 {
    0.5
}

fn default_architecture() -> String {
    "x86_64".to_string()
}

fn default_ephemeral_gb() -> f64 {
    20.0
}

#[derive(Debug, Clone, Deserialize, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct FargateConfiguration {
    /// Average concurrently running tasks. Default 1
    #[serde(default = "default_tasks")]
    #[validate(range(min = 0.0))]
    pub tasks: f64,
    /// Default 0.25
    #[serde(default = "default_vcpu")]
    #[validate(range(min = 0.25, max = 16.0))]
    pub vcpu: f64,
    /// Default 0.5
    #[serde(default = "default_memory_gb")]
    #[validate(range(min = 0.5, max = 120.0))]
    pub memory_gb: f64,
    #[serde(default = "default_hours")]
    #[validate(range(min = 0.0, max = 744.0))]
    pub hours_per_month: f64,
    /// `x86_64` or `arm64`
    #[serde(default = "default_architecture")]
    pub architecture: String,
    #[serde(default)]
    pub operating_system: OperatingSystem,
    #[serde(default)]
    pub spot: bool,
    /// Default 20 (included)
    #[serde(default = "default_ephemeral_gb")]
    #[validate(range(min = 20.0, max = 200.0))]
    pub ephemeral_storage_gb: f64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FargateArchitectureRate {
    pub vcpu_hour: f64,
    pub gb_hour: f64,
}

/// `fargate` category
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FargateRates {
    pub architectures: HashMap<String, FargateArchitectureRate>,
    pub windows_license_per_vcpu_hour: f64,
    /// Fraction taken off vCPU and memory when running on Spot
    pub spot_discount: f64,
    pub ephemeral_storage_per_gb_hour: f64,
    pub included_ephemeral_gb: f64,
}

pub fn compute(config: &FargateConfiguration, rates: &FargateRates) -> PricingResult<CostBreakdown> {
    let arch = rate_for(&rates.architectures, &config.architecture, SERVICE_CODE, "architecture")?;

    let task_hours = config.tasks * config.hours_per_month;
    let discount = if config.spot { 1.0 - rates.spot_discount } else { 1.0 };

    let license = match config.operating_system {
        OperatingSystem::Linux => 0.0,
        OperatingSystem::Windows => config.vcpu * task_hours * rates.windows_license_per_vcpu_hour,
    };

    let extra_storage = billable_after_free_tier(config.ephemeral_storage_gb, rates.included_ephemeral_gb);

    Ok(CostBreakdown::new()
        .with("vcpu", config.vcpu * task_hours * arch.vcpu_hour * discount)
        .with("memory", config.memory_gb * task_hours * arch.gb_hour * discount)
        .with("osLicense", license)
        .with(
            "ephemeralStorage",
            extra_storage * task_hours * rates.ephemeral_storage_per_gb_hour,
        ))
}

pub struct FargateModel;

#[async_trait]
impl CostModel for FargateModel {
    fn service_code(&self) -> &'static str {
        SERVICE_CODE
    }

    fn name(&self) -> &'static str {
        "Amazon ECS on Fargate"
    }

    async fn calculate(
        &self,
        pricing: &PricingAccessor,
        region: &str,
        configuration: Value,
    ) -> PricingResult<CalculationResult> {
        let config: FargateConfiguration = parse_configuration(SERVICE_CODE, configuration)?;
        let rates: FargateRates = pricing.rates(SERVICE_CODE, region, Some("fargate")).await?;
        compute(&config, &rates).map(CalculationResult::from_breakdown)
    }
}
