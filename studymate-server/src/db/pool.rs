//! PostgreSQL pool for the partner collections

use std::time::Duration;

use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

use crate::config::DatabaseConfig;

/// How long a handler waits for a free connection before the request fails
pub const ACQUIRE_TIMEOUT: Duration = Duration::from_secs(10);

fn pool_options(config: &DatabaseConfig) -> PgPoolOptions {
    // sqlx rejects a zero-sized pool
    PgPoolOptions::new()
        .max_connections(config.max_connections.max(1))
        .acquire_timeout(ACQUIRE_TIMEOUT)
}

/// Connect to the configured database.
///
/// Only the redacted URL is logged.
///
/// # Example
///
/// ```ignore
/// let pool = connect(&DatabaseConfig::from_url("postgres://localhost/studymate")).await?;
/// ```
pub async fn connect(config: &DatabaseConfig) -> Result<PgPool, sqlx::Error> {
    let pool = pool_options(config)
        .connect(&config.connection_url())
        .await?;

    tracing::info!(
        database = %config.redacted_url(),
        max_connections = config.max_connections,
        "database pool ready"
    );
    Ok(pool)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pool_is_sized_from_config() {
        let config = DatabaseConfig {
            max_connections: 12,
            ..Default::default()
        };
        let options = pool_options(&config);
        assert_eq!(options.get_max_connections(), 12);
        assert_eq!(options.get_acquire_timeout(), ACQUIRE_TIMEOUT);
    }

    #[test]
    fn zero_connections_becomes_one() {
        let config = DatabaseConfig {
            max_connections: 0,
            ..Default::default()
        };
        assert_eq!(pool_options(&config).get_max_connections(), 1);
    }

    // Run with: DATABASE_URL=postgres://... cargo test -p studymate-server -- --ignored
    #[tokio::test]
    #[ignore = "requires database"]
    async fn pool_reaches_database() {
        let url = std::env::var("DATABASE_URL").expect("DATABASE_URL required");
        let pool = connect(&DatabaseConfig::from_url(url)).await.expect("connect failed");

        let (one,): (i32,) = sqlx::query_as("SELECT 1")
            .fetch_one(&pool)
            .await
            .expect("query failed");
        assert_eq!(one, 1);
    }
}
