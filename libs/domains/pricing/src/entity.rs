use sea_orm::ActiveValue::Set;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::models::PricingDocument;

/// Sea-ORM entity for the pricing_documents table
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "pricing_documents")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(column_type = "String(StringLen::N(100))")]
    pub service_code: String,
    #[sea_orm(column_type = "String(StringLen::N(50))")]
    pub region: String,
    #[sea_orm(column_type = "String(StringLen::N(100))", nullable)]
    pub pricing_category: Option<String>,
    pub effective_date: DateTimeWithTimeZone,
    #[sea_orm(column_type = "JsonBinary")]
    pub rates: Json,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for PricingDocument {
    fn from(model: Model) -> Self {
        Self {
            service_code: model.service_code,
            region: model.region,
            pricing_category: model.pricing_category,
            effective_date: model.effective_date.into(),
            rates: model.rates,
        }
    }
}

impl From<PricingDocument> for ActiveModel {
    fn from(document: PricingDocument) -> Self {
        ActiveModel {
            id: Set(Uuid::now_v7()),
            service_code: Set(document.service_code),
            region: Set(document.region.to_lowercase()),
            pricing_category: Set(document.pricing_category),
            effective_date: Set(document.effective_date.into()),
            rates: Set(document.rates),
            created_at: Set(chrono::Utc::now().into()),
        }
    }
}
