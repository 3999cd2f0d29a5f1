//! PostgreSQL adapters - Database implementations of the persistence ports.
//!
//! - `PostgresTransactionFactory` - Storage transactions for the Unit of Work
//! - `PostgresUserReader` - Pool-bound user lookups
//! - `PostgresOutboxStore` - Outbox fetch/mark for the dispatcher

mod outbox_store;
mod transaction;
mod user_reader;
mod user_row;

pub use outbox_store::PostgresOutboxStore;
pub use transaction::{PostgresTransaction, PostgresTransactionFactory};
pub use user_reader::PostgresUserReader;

use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

use crate::config::DatabaseConfig;
use crate::domain::foundation::InfrastructureError;

/// Build a connection pool from configuration.
pub async fn connect(config: &DatabaseConfig) -> Result<PgPool, InfrastructureError> {
    PgPoolOptions::new()
        .min_connections(config.min_connections)
        .max_connections(config.max_connections)
        .acquire_timeout(config.acquire_timeout())
        .idle_timeout(config.idle_timeout())
        .max_lifetime(config.max_lifetime())
        .connect(&config.url)
        .await
        .map_err(|e| InfrastructureError::database(format!("Failed to connect: {}", e)))
}

/// Apply the bundled schema migrations.
pub async fn run_migrations(pool: &PgPool) -> Result<(), InfrastructureError> {
    sqlx::migrate!("./migrations")
        .run(pool)
        .await
        .map_err(|e| InfrastructureError::database(format!("Failed to run migrations: {}", e)))
}
