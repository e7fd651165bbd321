//! Cost model trait and the registry that dispatches service codes to models.

use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;

use crate::accessor::PricingAccessor;
use crate::calculators;
use crate::error::{PricingError, PricingResult};
use crate::models::{CalculationResult, ServiceDescriptor};

/// Estimates the monthly cost of one service
#[async_trait]
pub trait CostModel: Send + Sync {
    /// Provider offer code, e.g. `AmazonEC2`
    fn service_code(&self) -> &'static str;

    /// Human-readable service name
    fn name(&self) -> &'static str;

    /// Evaluate a usage configuration against the region's pricing data
    async fn calculate(
        &self,
        pricing: &PricingAccessor,
        region: &str,
        configuration: Value,
    ) -> PricingResult<CalculationResult>;
}

/// Registry of cost models, keyed case-insensitively by service code
#[derive(Default)]
pub struct ModelRegistry {
    models: HashMap<String, Arc<dyn CostModel>>,
    order: Vec<Arc<dyn CostModel>>,
}

impl ModelRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with every shipped cost model
    pub fn with_default_models() -> Self {
        let mut registry = Self::new();
        for model in calculators::default_models() {
            registry.register(model);
        }
        registry
    }

    /// Register a model; a later registration for the same code replaces the earlier one
    pub fn register(&mut self, model: Arc<dyn CostModel>) {
        let key = model.service_code().to_lowercase();
        if self.models.insert(key, model.clone()).is_some() {
            self.order
                .retain(|m| !m.service_code().eq_ignore_ascii_case(model.service_code()));
        }
        self.order.push(model);
    }

    pub fn resolve(&self, service_code: &str) -> PricingResult<Arc<dyn CostModel>> {
        self.models
            .get(&service_code.trim().to_lowercase())
            .cloned()
            .ok_or_else(|| PricingError::UnsupportedService(service_code.to_string()))
    }

    pub fn is_supported(&self, service_code: &str) -> bool {
        self.models
            .contains_key(&service_code.trim().to_lowercase())
    }

    /// Supported service codes in registration order
    pub fn list_supported(&self) -> Vec<String> {
        self.order
            .iter()
            .map(|m| m.service_code().to_string())
            .collect()
    }

    pub fn describe_supported(&self) -> Vec<ServiceDescriptor> {
        self.order.iter().map(|m| describe(m.as_ref())).collect()
    }

    /// Descriptor for one service, if supported
    pub fn describe(&self, service_code: &str) -> PricingResult<ServiceDescriptor> {
        self.resolve(service_code).map(|m| describe(m.as_ref()))
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

fn describe(model: &dyn CostModel) -> ServiceDescriptor {
    ServiceDescriptor {
        service_code: model.service_code().to_string(),
        name: model.name().to_string(),
    }
}
