//! Subcommand implementations

pub mod migrate;
pub mod serve;

pub use migrate::{run_migrate, MigrateArgs};
pub use serve::{run_serve, ServeArgs};

use clap::Args;
use studymate_server::DatabaseConfig;

/// Database connection flags shared by `serve` and `migrate`
#[derive(Args, Debug, Clone)]
pub struct DatabaseArgs {
    /// Full database URL (overrides the DB_* parts)
    #[arg(long, env = "DATABASE_URL")]
    pub database_url: Option<String>,

    /// Database user
    #[arg(long, env = "DB_USER")]
    pub db_user: Option<String>,

    /// Database password
    #[arg(long, env = "DB_PASS", hide_env_values = true)]
    pub db_pass: Option<String>,

    /// Database host and port
    #[arg(long, env = "DB_HOST", default_value = studymate_server::config::DEFAULT_DB_HOST)]
    pub db_host: String,

    /// Database name
    #[arg(long, env = "DB_NAME", default_value = studymate_server::config::DEFAULT_DB_NAME)]
    pub db_name: String,

    /// Maximum pooled connections
    #[arg(
        long,
        env = "DB_MAX_CONNECTIONS",
        default_value_t = studymate_server::config::DEFAULT_MAX_CONNECTIONS
    )]
    pub max_connections: u32,
}

impl From<DatabaseArgs> for DatabaseConfig {
    fn from(args: DatabaseArgs) -> Self {
        Self {
            url: args.database_url.filter(|u| !u.is_empty()),
            user: args.db_user,
            password: args.db_pass,
            host: args.db_host,
            name: args.db_name,
            max_connections: args.max_connections,
        }
    }
}
