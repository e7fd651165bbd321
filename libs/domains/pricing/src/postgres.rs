use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, TransactionTrait,
};

use crate::entity::{ActiveModel, Column, Entity};
use crate::error::PricingResult;
use crate::models::{PricingDocument, PricingKey};
use crate::repository::PricingStore;

/// PostgreSQL implementation of PricingStore
#[derive(Clone)]
pub struct PgPricingStore {
    db: DatabaseConnection,
}

impl PgPricingStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Insert many documents in one transaction, returning how many were written.
    ///
    /// Nothing is written if any insert fails.
    pub async fn insert_many(&self, documents: Vec<PricingDocument>) -> PricingResult<usize> {
        let txn = self.db.begin().await?;
        let mut written = 0;
        for document in documents {
            let model: ActiveModel = document.into();
            model.insert(&txn).await?;
            written += 1;
        }
        txn.commit().await?;
        Ok(written)
    }

    pub async fn count(&self) -> PricingResult<u64> {
        Ok(Entity::find().count(&self.db).await?)
    }
}

#[async_trait]
impl PricingStore for PgPricingStore {
    async fn latest(&self, key: &PricingKey) -> PricingResult<Option<PricingDocument>> {
        let mut query = Entity::find()
            .filter(Column::ServiceCode.eq(key.service_code.as_str()))
            .filter(Column::Region.eq(key.region.as_str()));

        if let Some(category) = &key.category {
            query = query.filter(Column::PricingCategory.eq(category.as_str()));
        }

        let result = query
            .order_by_desc(Column::EffectiveDate)
            .one(&self.db)
            .await?
            .map(Into::into);
        Ok(result)
    }

    async fn insert(&self, document: PricingDocument) -> PricingResult<()> {
        let model: ActiveModel = document.into();
        model.insert(&self.db).await?;
        Ok(())
    }
}
