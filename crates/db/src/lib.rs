//! Persistence for accounts and track listings.
//!
//! - [`models`] -- row structs and create/update DTOs.
//! - [`repositories`] -- zero-sized Postgres repositories over `&PgPool`.
//! - [`store`] -- the [`Store`](store::Store) trait the HTTP layer depends on,
//!   with Postgres and in-memory implementations.

pub mod models;
pub mod repositories;
pub mod store;

use sqlx::postgres::PgPoolOptions;

pub type DbPool = sqlx::PgPool;

/// URL scheme selecting the in-memory store instead of Postgres.
pub const MEMORY_URL_SCHEME: &str = "memory:";

const MAX_CONNECTIONS: u32 = 10;

/// Create a connection pool from a database URL.
pub async fn create_pool(database_url: &str) -> Result<DbPool, sqlx::Error> {
    let pool = PgPoolOptions::new()
        .max_connections(MAX_CONNECTIONS)
        .connect(database_url)
        .await?;
    tracing::info!(max_connections = MAX_CONNECTIONS, "Database pool ready");
    Ok(pool)
}

/// Round-trip a trivial query to confirm the database is reachable.
pub async fn health_check(pool: &DbPool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}

/// Apply any pending migrations from `crates/db/migrations`.
pub async fn run_migrations(pool: &DbPool) -> Result<(), sqlx::migrate::MigrateError> {
    let migrator = sqlx::migrate!("./migrations");
    migrator.run(pool).await?;
    tracing::info!(count = migrator.iter().count(), "Migrations applied");
    Ok(())
}

/// Whether a `DATABASE_URL` selects the in-memory store.
pub fn is_memory_url(database_url: &str) -> bool {
    database_url.starts_with(MEMORY_URL_SCHEME)
}
