mod error;
mod executor;
pub mod memory;
mod models;
mod postgres;
pub mod repositories;
pub mod store;

use std::str::FromStr;

use anyhow::{Context, Result};
use sqlx::postgres::{PgConnectOptions, PgPool, PgPoolOptions};

use crate::config::DatabaseConfig;

pub use error::{is_transient, DatabaseError};
pub use executor::{QueryExecutor, RetryPolicy};
pub use memory::MemoryRentalStore;
pub use models::*;
pub use postgres::PgRentalStore;
pub use store::RentalStore;

/// Connects the session pool and brings the schema up to date.
pub async fn init_pool(config: &DatabaseConfig) -> Result<PgPool> {
    let options = PgConnectOptions::from_str(&config.endpoint)
        .context("Failed to parse DATABASE_ENDPOINT")?
        .database(&config.name);

    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .acquire_timeout(config.connect_timeout())
        .connect_with(options)
        .await
        .map_err(|e| DatabaseError::ConnectionError(e.to_string()))
        .context("Failed to connect to the database")?;

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .map_err(DatabaseError::from)
        .context("Failed to run database migrations")?;

    Ok(pool)
}
