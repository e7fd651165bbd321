//! Cost Estimator
//!
//! Prices cloud service configurations against stored rate tables.
//! Runs as an HTTP service or as one-shot CLI commands.

use clap::{ArgGroup, Parser, Subcommand};
use core_config::Environment;
use core_config::tracing::{init_tracing, install_color_eyre};
use domain_pricing::DEFAULT_REGION;
use eyre::Result;
use std::path::PathBuf;
use tracing::info;

mod backends;
mod commands;
mod config;
mod server;

use backends::Backends;
use config::Config;

#[derive(Parser)]
#[command(name = "cost-estimator")]
#[command(about = "Estimate monthly and annual cloud costs from service configurations")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP API
    Serve,

    /// Load pricing documents into Postgres
    #[command(group(ArgGroup::new("source").required(true).args(["file", "sample"])))]
    Seed {
        /// JSON array of pricing documents
        #[arg(short, long)]
        file: Option<PathBuf>,

        /// Use the bundled us-east-1 sample rate tables
        #[arg(long)]
        sample: bool,
    },

    /// Estimate one configuration and print the result as JSON
    Calculate {
        /// Service code, e.g. AmazonEC2
        #[arg(short, long)]
        service: String,

        #[arg(short, long, default_value = DEFAULT_REGION)]
        region: String,

        /// Configuration as a JSON object
        #[arg(short, long, default_value = "{}")]
        config: String,
    },

    /// List supported services
    Services,

    /// Apply database migrations
    Migrate,
}

#[tokio::main]
async fn main() -> Result<()> {
    install_color_eyre();

    let environment = Environment::from_env();
    init_tracing(&environment);

    let cli = Cli::parse();

    match cli.command {
        Commands::Serve => {
            let config = Config::from_env()?;
            observability::init_metrics()?;

            let backends = Backends::from_config(&config).await?;
            let app = server::app(backends.estimator.clone());

            info!(
                store = ?config.store.backend,
                cache = ?config.cache.backend,
                "Starting cost estimator"
            );
            server::serve(app, &config.server).await?;

            backends.close().await;
            info!("Cost estimator shutdown complete");
        }
        Commands::Seed { file, sample } => commands::seed(file, sample).await?,
        Commands::Calculate {
            service,
            region,
            config,
        } => commands::calculate(&Config::from_env()?, &service, &region, &config).await?,
        Commands::Services => commands::services(),
        Commands::Migrate => commands::migrate().await?,
    }

    Ok(())
}
