//! Pricing Domain
//!
//! Cost estimation for cloud service configurations.
//!
//! # Architecture
//!
//! ```text
//! ┌───────────────┐
//! │ CostEstimator │  ← Single and batch calculation
//! └──────┬────────┘
//!        │
//! ┌──────▼────────┐
//! │ ModelRegistry │  ← Service code → CostModel
//! └──────┬────────┘
//!        │
//! ┌──────▼──────────┐
//! │ PricingAccessor │  ← Cache first, then PricingStore
//! └─────────────────┘
//! ```

pub mod accessor;
pub mod cache;
pub mod calculators;
pub mod entity;
pub mod error;
pub mod handlers;
pub mod models;
pub mod normalize;
pub mod postgres;
pub mod registry;
pub mod repository;
pub mod rounding;
pub mod sample_data;
pub mod service;
pub mod tiered;

// Re-export commonly used types
pub use accessor::{DEFAULT_CACHE_TTL, PricingAccessor};
pub use cache::{CacheError, InMemoryPricingCache, PricingCache, RedisPricingCache};
pub use error::{PricingError, PricingResult};
pub use models::{
    BatchCalculationRequest, BatchItemError, BatchItemResult, BatchResult, CalculationRequest,
    CalculationResult, CostBreakdown, DEFAULT_REGION, PriceTier, PricingDocument, PricingKey,
    ServiceDescriptor,
};
pub use postgres::PgPricingStore;
pub use registry::{CostModel, ModelRegistry};
pub use repository::{InMemoryPricingStore, PricingStore, load_documents};
pub use rounding::{annualize, round_to_cents};
pub use sample_data::sample_pricing_documents;
pub use service::CostEstimator;
pub use tiered::apply_tiered_pricing;
