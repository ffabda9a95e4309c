//! Connection pool setup and schema migrations for the embedded store.

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::str::FromStr;
use std::time::Duration;

use crate::config::Config;

/// Opens the connection pool, enables per-connection pragmas, and runs any
/// pending migrations under `migration_dir`. Returns a pool ready to be
/// handed to the repository layer.
pub async fn connect(config: &Config) -> Result<SqlitePool, sqlx::Error> {
    tracing::info!(path = %config.database_path, "opening database");

    let connect_options = SqliteConnectOptions::from_str(&format!(
        "sqlite://{}",
        config.database_path
    ))?
    .create_if_missing(true)
    .foreign_keys(true)
    .busy_timeout(Duration::from_secs(5));

    let pool = SqlitePoolOptions::new()
        .max_connections(config.db_max_open_conns)
        .min_connections(config.db_max_idle_conns)
        .max_lifetime(Some(config.db_conn_max_lifetime))
        .connect_with(connect_options)
        .await?;

    tracing::info!(
        max_conns = config.db_max_open_conns,
        "database connected"
    );

    let migrator = sqlx::migrate::Migrator::new(std::path::Path::new(&config.migration_dir))
        .await
        .map_err(|e| sqlx::Error::Migrate(Box::new(e)))?;
    migrator
        .run(&pool)
        .await
        .map_err(|e| sqlx::Error::Migrate(Box::new(e)))?;

    tracing::info!("migrations applied");

    Ok(pool)
}

/// Health check used by `GET /api/health`: a trivial round-trip query.
pub async fn ping(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}
