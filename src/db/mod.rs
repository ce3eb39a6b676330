//! Database connection pool and migration utilities.

use std::str::FromStr;

use sqlx::migrate::{MigrateError, Migrator};
use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use sqlx::PgPool;

/// Schema, singleton total row, and the `increment_campaign` function.
pub static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

/// Connection options for the store URL with the access key applied as the
/// password, overriding any password embedded in the URL.
pub fn connect_options(store_url: &str, access_key: &str) -> Result<PgConnectOptions, sqlx::Error> {
    Ok(PgConnectOptions::from_str(store_url)?.password(access_key))
}

/// Create a PostgreSQL connection pool.
pub async fn create_pool(
    store_url: &str,
    access_key: &str,
    max_connections: u32,
) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(max_connections)
        .connect_with(connect_options(store_url, access_key)?)
        .await
}

/// Create a pool that connects on first use, so startup does not depend on
/// the store being reachable.
pub fn create_lazy_pool(
    store_url: &str,
    access_key: &str,
    max_connections: u32,
) -> Result<PgPool, sqlx::Error> {
    Ok(PgPoolOptions::new()
        .max_connections(max_connections)
        .connect_lazy_with(connect_options(store_url, access_key)?))
}

/// Apply any pending migrations.
pub async fn run_migrations(pool: &PgPool) -> Result<(), MigrateError> {
    MIGRATOR.run(pool).await
}
