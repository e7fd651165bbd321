//! One-shot CLI commands

use core_config::FromEnv;
use core_config::database::DatabaseConfig;
use domain_pricing::{
    ModelRegistry, PgPricingStore, PricingDocument, load_documents, sample_pricing_documents,
};
use eyre::{Result, WrapErr, bail};
use migration::{Migrator, MigratorTrait};
use serde_json::Value;
use std::path::PathBuf;
use tracing::info;

use crate::backends::{Backends, connect_database};
use crate::config::Config;

pub async fn migrate() -> Result<()> {
    let db = connect_database(&DatabaseConfig::from_env()?).await?;
    info!("Running pricing database migrations...");
    Migrator::up(&db, None).await?;
    info!("Migrations complete");
    db.close().await?;
    Ok(())
}

/// Load documents into Postgres, applying migrations first
pub async fn seed(file: Option<PathBuf>, sample: bool) -> Result<()> {
    let documents: Vec<PricingDocument> = match (file, sample) {
        (Some(path), _) => load_documents(&path)?,
        (None, true) => sample_pricing_documents(),
        (None, false) => bail!("either --file or --sample is required"),
    };

    let db = connect_database(&DatabaseConfig::from_env()?).await?;
    Migrator::up(&db, None).await?;

    let store = PgPricingStore::new(db.clone());
    let written = store.insert_many(documents).await?;
    info!(written, total = store.count().await?, "Pricing documents seeded");

    db.close().await?;
    Ok(())
}

pub async fn calculate(config: &Config, service: &str, region: &str, raw: &str) -> Result<()> {
    let configuration: Value =
        serde_json::from_str(raw).wrap_err("--config must be a JSON object")?;

    let backends = Backends::from_config(config).await?;
    let outcome = backends
        .estimator
        .calculate(service, region, configuration)
        .await;
    backends.close().await;

    println!("{}", serde_json::to_string_pretty(&outcome?)?);
    Ok(())
}

pub fn services() {
    for service in ModelRegistry::with_default_models().describe_supported() {
        println!("{:<20} {}", service.service_code, service.name);
    }
}
