//! Workflow orchestration.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use validator::Validate;

use crate::accessor::PricingAccessor;
use crate::error::PricingResult;
use crate::models::{CalculationResult, CostBreakdown};
use crate::normalize::{
    billable_after_free_tier, default_true, mb_to_gb, ms_to_seconds, parse_configuration,
    per_million, round_up_to,
};
use crate::registry::CostModel;

const SERVICE_CODE: &str = "AWSStepFunctions";

/// Express workflows bill memory in 64 MB steps
pub const EXPRESS_MEMORY_INCREMENT_MB: f64 = 64.0;

/// Express workflows bill duration in 100 ms steps
pub const EXPRESS_DURATION_INCREMENT_MS: f64 = 100.0;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum WorkflowType {
    #[default]
    Standard,
    Express,
}

fn default_duration_ms() -> f64 {
    EXPRESS_DURATION_INCREMENT_MS
}

fn default_memory_mb() -> f64 {
    EXPRESS_MEMORY_INCREMENT_MB
}

#[derive(Debug, Clone, Deserialize, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct StepFunctionsConfiguration {
    #[serde(default)]
    pub workflow_type: WorkflowType,
    /// Standard: state transitions per month
    #[serde(default)]
    #[validate(range(min = 0.0))]
    pub state_transitions: f64,
    /// Express: executions per month
    #[serde(default)]
    #[validate(range(min = 0.0))]
    pub executions: f64,
    /// Express: average execution duration. Default 100
    #[serde(default = "default_duration_ms")]
    #[validate(range(min = 0.0))]
    pub duration_ms: f64,
    /// Express: memory used. Default 64
    #[serde(default = "default_memory_mb")]
    #[validate(range(min = 0.0))]
    pub memory_mb: f64,
    #[serde(default = "default_true")]
    pub include_free_tier: bool,
}

/// `workflows` category
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StepFunctionsRates {
    pub standard_per_1000_transitions: f64,
    pub free_transitions: f64,
    pub express_per_million_requests: f64,
    pub express_per_gb_second: f64,
}

pub fn compute(config: &StepFunctionsConfiguration, rates: &StepFunctionsRates) -> CostBreakdown {
    match config.workflow_type {
        WorkflowType::Standard => {
            let free = if config.include_free_tier { rates.free_transitions } else { 0.0 };
            let transitions = billable_after_free_tier(config.state_transitions, free);
            CostBreakdown::new().with(
                "stateTransitions",
                transitions / 1000.0 * rates.standard_per_1000_transitions,
            )
        }
        WorkflowType::Express => {
            // Every execution bills at least one increment of each
            let memory_gb = mb_to_gb(
                round_up_to(config.memory_mb, EXPRESS_MEMORY_INCREMENT_MB)
                    .max(EXPRESS_MEMORY_INCREMENT_MB),
            );
            let seconds = ms_to_seconds(
                round_up_to(config.duration_ms, EXPRESS_DURATION_INCREMENT_MS)
                    .max(EXPRESS_DURATION_INCREMENT_MS),
            );
            let gb_seconds = memory_gb * seconds * config.executions;

            CostBreakdown::new()
                .with(
                    "requests",
                    per_million(config.executions) * rates.express_per_million_requests,
                )
                .with("duration", gb_seconds * rates.express_per_gb_second)
        }
    }
}

pub struct StepFunctionsModel;

#[async_trait]
impl CostModel for StepFunctionsModel {
    fn service_code(&self) -> &'static str {
        SERVICE_CODE
    }

    fn name(&self) -> &'static str {
        "AWS Step Functions"
    }

    async fn calculate(
        &self,
        pricing: &PricingAccessor,
        region: &str,
        configuration: Value,
    ) -> PricingResult<CalculationResult> {
        let config: StepFunctionsConfiguration = parse_configuration(SERVICE_CODE, configuration)?;
        let rates: StepFunctionsRates = pricing.rates(SERVICE_CODE, region, Some("workflows")).await?;
        Ok(CalculationResult::from_breakdown(compute(&config, &rates)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculators::test_support::sample_accessor;
    use serde_json::json;

    async fn calculate(configuration: Value) -> CalculationResult {
        StepFunctionsModel
            .calculate(&sample_accessor(), "us-east-1", configuration)
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_standard_transitions_after_free_tier() {
        let result = calculate(json!({"stateTransitions": 1004000})).await;
        assert_eq!(result.cost_breakdown.get("stateTransitions"), Some(25.0));
    }

    #[tokio::test]
    async fn test_express_rounds_memory_and_duration_up() {
        // 1M × 128 MB (100 → 128) × 0.2 s (150 → 200 ms) = 25,000 GB-s
        let result = calculate(json!({
            "workflowType": "express",
            "executions": 1000000,
            "memoryMb": 100,
            "durationMs": 150
        }))
        .await;
        assert_eq!(result.cost_breakdown.get("requests"), Some(1.0));
        assert_eq!(result.cost_breakdown.get("duration"), Some(0.42));
    }

    #[tokio::test]
    async fn test_express_bills_at_least_one_increment() {
        let zero = calculate(json!({
            "workflowType": "express",
            "executions": 100000000,
            "memoryMb": 0,
            "durationMs": 0
        }))
        .await;
        let minimal = calculate(json!({
            "workflowType": "express",
            "executions": 100000000,
            "memoryMb": 1,
            "durationMs": 1
        }))
        .await;

        assert_eq!(minimal.cost_breakdown.get("duration"), Some(10.42));
        assert_eq!(zero.cost_breakdown.get("duration"), Some(10.42));
        assert_eq!(zero.monthly_cost, minimal.monthly_cost);
    }

    #[tokio::test]
    async fn test_unknown_workflow_type_is_invalid() {
        let err = StepFunctionsModel
            .calculate(&sample_accessor(), "us-east-1", json!({"workflowType": "batch"}))
            .await
            .unwrap_err();
        assert_eq!(err.code(), "invalid_configuration");
    }
}
