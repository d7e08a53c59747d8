use std::str::FromStr;
use std::time::Duration;

use sqlx::postgres::PgPoolOptions;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{PgPool, SqlitePool};

use crate::config::{DatabaseBackend, DatabaseConfig};
use crate::Result;

/// Connection pool over whichever backend the configuration selected.
///
/// Query text is shared between the two backends: statements are written with
/// positional `$N` placeholders in strictly ascending order of first
/// occurrence, which both PostgreSQL and SQLite bind identically.
#[derive(Clone)]
pub enum DbPool {
    Postgres(PgPool),
    Sqlite(SqlitePool),
}

impl DbPool {
    /// Open a pool for the configured backend.
    pub async fn connect(config: &DatabaseConfig) -> Result<Self> {
        match config.backend {
            DatabaseBackend::Postgres => {
                let pool = PgPoolOptions::new()
                    .max_connections(config.max_connections)
                    .acquire_timeout(Duration::from_secs(config.connect_timeout_seconds))
                    .idle_timeout(Duration::from_secs(config.idle_timeout_seconds))
                    .connect(&config.url)
                    .await?;
                Ok(Self::Postgres(pool))
            }
            DatabaseBackend::Sqlite => {
                let options =
                    SqliteConnectOptions::from_str(&config.url)?.create_if_missing(true);
                // An in-memory SQLite database exists per connection; a larger
                // pool would hand out empty databases.
                let max_connections = if config.url.contains(":memory:") {
                    1
                } else {
                    config.max_connections
                };
                let pool = SqlitePoolOptions::new()
                    .max_connections(max_connections)
                    .acquire_timeout(Duration::from_secs(config.connect_timeout_seconds))
                    .idle_timeout(Duration::from_secs(config.idle_timeout_seconds))
                    .connect_with(options)
                    .await?;
                Ok(Self::Sqlite(pool))
            }
        }
    }

    #[must_use]
    pub const fn backend(&self) -> DatabaseBackend {
        match self {
            Self::Postgres(_) => DatabaseBackend::Postgres,
            Self::Sqlite(_) => DatabaseBackend::Sqlite,
        }
    }

    pub async fn close(&self) {
        match self {
            Self::Postgres(pool) => pool.close().await,
            Self::Sqlite(pool) => pool.close().await,
        }
    }
}

/// Run the same query body against whichever backend the pool wraps.
///
/// The body is expanded once per arm, so it type-checks against each driver
/// independently; it must therefore evaluate to a backend-neutral value
/// (mapped rows, affected-row counts) rather than driver-specific types.
macro_rules! with_pool {
    ($db:expr, $pool:ident => $body:expr) => {
        match $db {
            $crate::db::DbPool::Postgres($pool) => $body,
            $crate::db::DbPool::Sqlite($pool) => $body,
        }
    };
}

pub(crate) use with_pool;
