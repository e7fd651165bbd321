use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(PricingDocuments::Table)
                    .if_not_exists()
                    .col(pk_uuid(PricingDocuments::Id))
                    .col(string_len(PricingDocuments::ServiceCode, 100).not_null())
                    .col(string_len(PricingDocuments::Region, 50).not_null())
                    .col(string_len_null(PricingDocuments::PricingCategory, 100))
                    .col(timestamp_with_time_zone(PricingDocuments::EffectiveDate).not_null())
                    .col(json_binary(PricingDocuments::Rates).not_null())
                    .col(
                        timestamp_with_time_zone(PricingDocuments::CreatedAt)
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        // Latest-document lookup: service + region (+ category), newest first
        manager
            .create_index(
                Index::create()
                    .name("idx_pricing_documents_lookup")
                    .table(PricingDocuments::Table)
                    .col(PricingDocuments::ServiceCode)
                    .col(PricingDocuments::Region)
                    .col(PricingDocuments::PricingCategory)
                    .col((PricingDocuments::EffectiveDate, IndexOrder::Desc))
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(PricingDocuments::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum PricingDocuments {
    Table,
    Id,
    ServiceCode,
    Region,
    PricingCategory,
    EffectiveDate,
    Rates,
    CreatedAt,
}
