//! Schema migration command

use anyhow::{Context, Result};
use clap::Parser;

use studymate_server::db::{connect, migrations};
use studymate_server::DatabaseConfig;

use super::DatabaseArgs;

/// Arguments for the migrate command
#[derive(Parser, Debug)]
pub struct MigrateArgs {
    #[command(flatten)]
    pub database: DatabaseArgs,
}

/// Create the collection tables and exit
pub async fn run_migrate(args: MigrateArgs) -> Result<()> {
    let db = DatabaseConfig::from(args.database);
    tracing::info!(database = %db.redacted_url(), "Migrating database");

    let pool = connect(&db)
        .await
        .with_context(|| format!("Failed to connect to {}", db.redacted_url()))?;

    migrations::run(&pool)
        .await
        .context("Failed to run migrations")?;

    println!("Migrations applied to {}", db.redacted_url());
    Ok(())
}
