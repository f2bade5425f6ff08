//! # UCalgaryConnect API Main Entry Point
//!
//! This is the main entry point for the UCalgaryConnect API service.

use migration::MigratorTrait;
use uconnect::{
    config::ConfigLoader, db::init_pool, seeds::seed_skills, server::run_server,
    telemetry::init_tracing,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration from layered env files and variables
    let config_loader = ConfigLoader::new();
    let config = config_loader.load()?;

    init_tracing(&config)?;

    tracing::info!(profile = %config.profile, "Loaded configuration");
    if let Ok(redacted_json) = config.redacted_json() {
        tracing::debug!(config = %redacted_json, "Effective configuration");
    }

    let db = init_pool(&config).await?;
    migration::Migrator::up(&db, None).await?;
    seed_skills(&db).await?;

    run_server(config, db).await
}
