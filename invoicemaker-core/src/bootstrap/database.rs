//! Database initialization

use anyhow::Result;
use tracing::{error, info};

use crate::db::DbPool;
use crate::Config;

/// Initialize the database connection pool for the configured backend.
///
/// Note: schema bootstrap runs separately via the management commands.
pub async fn init_database(config: &Config) -> Result<DbPool> {
    info!("Connecting to database: {}", config.database_url());

    let pool = DbPool::connect(&config.database).await.map_err(|e| {
        error!("Failed to connect to database: {}", e);
        anyhow::anyhow!("Database connection failed: {e}")
    })?;

    info!("Database connected successfully");

    Ok(pool)
}
