//! Database - SQLite pool creation and embedded migrations

use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use std::str::FromStr;
use std::time::Duration;
use tracing::{info, instrument};

/// Connects to the database and returns a connection pool.
///
/// Foreign keys are enforced on every connection. An in-memory database lives
/// inside a single connection, so such a pool is pinned to one connection
/// that is never recycled.
#[instrument(skip(database_url))]
pub async fn connect_pool(
    database_url: &str,
    max_connections: u32,
    connection_lifetime_secs: u64,
) -> Result<SqlitePool, sqlx::Error> {
    let options = SqliteConnectOptions::from_str(database_url)?
        .create_if_missing(true)
        .foreign_keys(true);

    let pool = if database_url.contains(":memory:") {
        SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await?
    } else {
        SqlitePoolOptions::new()
            .max_connections(max_connections)
            .max_lifetime(Duration::from_secs(connection_lifetime_secs))
            .connect_with(options)
            .await?
    };

    info!("Database pool ready");
    Ok(pool)
}

/// Applies the migrations embedded from `./migrations`
pub async fn run_migrations(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    sqlx::migrate!("./migrations").run(pool).await?;
    info!("Migrations applied");
    Ok(())
}

/// Checks database health by acquiring a connection from the pool
pub async fn health_with_pool(pool: &SqlitePool) -> bool {
    pool.acquire().await.is_ok()
}
