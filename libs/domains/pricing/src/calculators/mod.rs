//! Per-service cost models.
//!
//! Every model follows the same shape: a configuration struct with serde
//! defaults and range validation, one rate struct per pricing category it
//! reads, and a pure `compute` function turning both into a [`CostBreakdown`].
//! The async [`CostModel`] impl only fetches documents and delegates.
//!
//! [`CostBreakdown`]: crate::models::CostBreakdown

mod api_gateway;
mod cloudfront;
mod cloudwatch;
mod dynamodb;
mod ebs;
mod ec2;
mod ecs;
mod efs;
mod eks;
mod elasticache;
mod elb;
mod kinesis;
mod lambda;
mod rds;
mod route53;
mod s3;
mod sns;
mod sqs;
mod step_functions;
mod transfer;
mod volumes;
mod vpc;

use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::models::PriceTier;
use crate::registry::CostModel;
use crate::tiered::apply_tiered_pricing;

pub use api_gateway::ApiGatewayModel;
pub use cloudfront::CloudFrontModel;
pub use cloudwatch::CloudWatchModel;
pub use dynamodb::DynamoDbModel;
pub use ebs::EbsModel;
pub use ec2::Ec2Model;
pub use ecs::FargateModel;
pub use efs::EfsModel;
pub use eks::EksModel;
pub use elasticache::ElastiCacheModel;
pub use elb::LoadBalancerModel;
pub use kinesis::KinesisModel;
pub use lambda::LambdaModel;
pub use rds::RdsModel;
pub use route53::Route53Model;
pub use s3::S3Model;
pub use sns::SnsModel;
pub use sqs::SqsModel;
pub use step_functions::StepFunctionsModel;
pub use transfer::TransferRates;
pub use volumes::{VolumeConfiguration, VolumeRates};
pub use vpc::VpcModel;

/// All shipped models, in catalog order
pub fn default_models() -> Vec<Arc<dyn CostModel>> {
    vec![
        Arc::new(Ec2Model),
        Arc::new(S3Model),
        Arc::new(LambdaModel),
        Arc::new(RdsModel),
        Arc::new(CloudFrontModel),
        Arc::new(Route53Model),
        Arc::new(DynamoDbModel),
        Arc::new(EksModel),
        Arc::new(FargateModel),
        Arc::new(ElastiCacheModel),
        Arc::new(EbsModel),
        Arc::new(EfsModel),
        Arc::new(SqsModel),
        Arc::new(SnsModel),
        Arc::new(ApiGatewayModel),
        Arc::new(VpcModel),
        Arc::new(LoadBalancerModel),
        Arc::new(CloudWatchModel),
        Arc::new(KinesisModel),
        Arc::new(StepFunctionsModel),
    ]
}

/// A unit price that rate tables express either flat or as progressive bands
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Rate {
    Flat(f64),
    Tiered(Vec<PriceTier>),
}

impl Rate {
    pub fn cost(&self, quantity: f64) -> f64 {
        match self {
            Rate::Flat(price) => quantity.max(0.0) * price,
            Rate::Tiered(tiers) => apply_tiered_pricing(quantity, tiers),
        }
    }
}

impl Default for Rate {
    fn default() -> Self {
        Rate::Flat(0.0)
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_rate_accepts_number_or_tiers() {
        let flat: Rate = serde_json::from_value(json!(0.08)).unwrap();
        assert_eq!(flat.cost(100.0), 8.0);

        let tiered: Rate = serde_json::from_value(json!([
            {"upTo": 10, "pricePerUnit": 1.0},
            {"upTo": null, "pricePerUnit": 0.5}
        ]))
        .unwrap();
        assert_eq!(tiered.cost(15.0), 12.5);
    }

    #[test]
    fn test_every_model_has_unique_code() {
        let models = default_models();
        let mut codes: Vec<_> = models.iter().map(|m| m.service_code()).collect();
        codes.sort_unstable();
        codes.dedup();
        assert_eq!(codes.len(), models.len());
    }
}
