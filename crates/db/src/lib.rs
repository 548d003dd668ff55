//! Postgres persistence for the warden service.
//!
//! Layout is repository-per-table: [`repositories`] holds zero-sized
//! structs with async CRUD methods over `&PgPool`, [`models`] holds the
//! row structs mapping the schema onto the core domain types, and
//! [`stores`] adapts the repositories to the `warden-core` store traits.

pub mod models;
pub mod repositories;
pub mod stores;

use sqlx::postgres::PgPoolOptions;

pub type DbPool = sqlx::PgPool;

/// Create a connection pool from a database URL.
pub async fn create_pool(database_url: &str) -> Result<DbPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(20)
        .connect(database_url)
        .await
}

/// Cheap connectivity probe.
pub async fn health_check(pool: &DbPool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}

/// Apply pending migrations from `crates/db/migrations`.
pub async fn run_migrations(pool: &DbPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await
}
