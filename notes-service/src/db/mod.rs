/// Database access layer
///
/// Repositories are free functions over `PgPool` (or a transaction's
/// connection where a caller needs multiple statements to commit together),
/// one module per aggregate.
pub mod audit_repo;
pub mod bookmark_repo;
pub mod download_repo;
pub mod note_repo;
pub mod report_repo;
pub mod user_repo;
pub mod vote_repo;

use sqlx::postgres::{PgPool, PgPoolOptions};
use std::time::Duration;

use crate::config::Config;

/// Create the service's connection pool.
pub async fn create_pool(config: &Config) -> Result<PgPool, sqlx::Error> {
    let pool = PgPoolOptions::new()
        .max_connections(config.db_max_connections)
        .min_connections(config.db_max_connections.min(2))
        .acquire_timeout(Duration::from_secs(10))
        .idle_timeout(Duration::from_secs(600))
        .max_lifetime(Duration::from_secs(1800))
        .connect(&config.database_url)
        .await?;

    tracing::info!(
        max_connections = config.db_max_connections,
        "Database pool created"
    );

    Ok(pool)
}
