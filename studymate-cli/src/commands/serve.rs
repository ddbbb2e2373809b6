//! HTTP server command
//!
//! Runs the StudyMate API on PostgreSQL, or on the in-memory store with
//! `--in-memory`.

use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;

use studymate_server::db::{connect, migrations};
use studymate_server::{run_server, AppState, DatabaseConfig, ServerConfig};

use super::DatabaseArgs;

/// Arguments for the serve command
#[derive(Parser, Debug)]
pub struct ServeArgs {
    /// Port to listen on
    #[arg(long, short = 'p', env = "PORT", default_value_t = 5000)]
    pub port: u16,

    /// Address to bind to
    #[arg(long, env = "HOST", default_value = "0.0.0.0")]
    pub host: IpAddr,

    /// Allowed CORS origin (repeatable); any origin when omitted
    #[arg(long = "cors-origin")]
    pub cors_origins: Vec<String>,

    /// Request timeout in seconds
    #[arg(long, env = "REQUEST_TIMEOUT_SECS", default_value_t = 30)]
    pub timeout: u64,

    /// Keep all data in process memory instead of PostgreSQL
    #[arg(long)]
    pub in_memory: bool,

    /// Don't create tables on startup
    #[arg(long)]
    pub skip_migrations: bool,

    #[command(flatten)]
    pub database: DatabaseArgs,
}

/// Run the HTTP server
pub async fn run_serve(args: ServeArgs) -> Result<()> {
    let config = ServerConfig {
        bind_addr: SocketAddr::new(args.host, args.port),
        cors_origins: args.cors_origins,
        request_timeout: Duration::from_secs(args.timeout),
    };

    let state = if args.in_memory {
        tracing::warn!("Using in-memory storage - data is lost on shutdown");
        AppState::in_memory()
    } else {
        let db = DatabaseConfig::from(args.database);
        let pool = connect(&db)
            .await
            .with_context(|| format!("Failed to connect to {}", db.redacted_url()))?;

        if !args.skip_migrations {
            migrations::run(&pool)
                .await
                .context("Failed to run migrations")?;
        }

        AppState::postgres(pool)
    };

    tracing::info!("Starting studymate server on {}", config.bind_addr);

    // Blocks until shutdown
    run_server(state, config).await.context("Server error")?;

    Ok(())
}
