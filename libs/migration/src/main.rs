//! Standalone migration runner for the pricing_documents schema
//! (`DATABASE_URL` selects the target database).

use migration::Migrator;
use sea_orm_migration::cli;

#[tokio::main]
async fn main() {
    cli::run_cli(Migrator).await;
}
