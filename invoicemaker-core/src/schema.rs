//! Idempotent schema bootstrap.
//!
//! Every statement is `CREATE TABLE IF NOT EXISTS`, so both entry points are
//! safe to run any number of times and never alter existing tables. DDL is
//! kept per backend because the auto-increment and binary column syntax
//! differ between PostgreSQL and SQLite.

use tracing::info;

use crate::config::DatabaseBackend;
use crate::db::{with_pool, DbPool};
use crate::Result;

struct TableDdl {
    name: &'static str,
    postgres: &'static str,
    sqlite: &'static str,
}

/// Tables owned by the application proper.
const MANAGED_TABLES: [TableDdl; 3] = [
    TableDdl {
        name: "users",
        postgres: r"
            CREATE TABLE IF NOT EXISTS users (
                id CHAR(12) PRIMARY KEY,
                username TEXT NOT NULL UNIQUE,
                email TEXT NULL,
                password_hash TEXT NOT NULL,
                role TEXT NOT NULL,
                created_at TIMESTAMP WITH TIME ZONE NOT NULL,
                updated_at TIMESTAMP WITH TIME ZONE NOT NULL
            );
        ",
        sqlite: r"
            CREATE TABLE IF NOT EXISTS users (
                id TEXT PRIMARY KEY,
                username TEXT NOT NULL UNIQUE,
                email TEXT NULL,
                password_hash TEXT NOT NULL,
                role TEXT NOT NULL,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            );
        ",
    },
    TableDdl {
        name: "business_profiles",
        postgres: r"
            CREATE TABLE IF NOT EXISTS business_profiles (
                id CHAR(12) PRIMARY KEY,
                name TEXT NOT NULL,
                email TEXT NULL,
                phone TEXT NULL,
                address TEXT NULL,
                logo TEXT NULL,
                logo_blob BYTEA NULL,
                logo_mime TEXT NULL,
                created_at TIMESTAMP WITH TIME ZONE NOT NULL,
                updated_at TIMESTAMP WITH TIME ZONE NOT NULL
            );
        ",
        sqlite: r"
            CREATE TABLE IF NOT EXISTS business_profiles (
                id TEXT PRIMARY KEY,
                name TEXT NOT NULL,
                email TEXT NULL,
                phone TEXT NULL,
                address TEXT NULL,
                logo TEXT NULL,
                logo_blob BLOB NULL,
                logo_mime TEXT NULL,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            );
        ",
    },
    TableDdl {
        name: "invoices",
        postgres: r"
            CREATE TABLE IF NOT EXISTS invoices (
                id CHAR(12) PRIMARY KEY,
                invoice_number TEXT NOT NULL UNIQUE,
                client_name TEXT NOT NULL,
                issue_date DATE NOT NULL,
                due_date DATE NULL,
                line_items JSONB NOT NULL DEFAULT '[]'::jsonb,
                subtotal DOUBLE PRECISION NOT NULL DEFAULT 0,
                tax DOUBLE PRECISION NOT NULL DEFAULT 0,
                total DOUBLE PRECISION NOT NULL DEFAULT 0,
                business_logo TEXT NULL,
                business_logo_blob BYTEA NULL,
                business_logo_mime TEXT NULL,
                created_at TIMESTAMP WITH TIME ZONE NOT NULL,
                updated_at TIMESTAMP WITH TIME ZONE NOT NULL
            );
        ",
        sqlite: r"
            CREATE TABLE IF NOT EXISTS invoices (
                id TEXT PRIMARY KEY,
                invoice_number TEXT NOT NULL UNIQUE,
                client_name TEXT NOT NULL,
                issue_date TEXT NOT NULL,
                due_date TEXT NULL,
                line_items TEXT NOT NULL DEFAULT '[]',
                subtotal REAL NOT NULL DEFAULT 0,
                tax REAL NOT NULL DEFAULT 0,
                total REAL NOT NULL DEFAULT 0,
                business_logo TEXT NULL,
                business_logo_blob BLOB NULL,
                business_logo_mime TEXT NULL,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            );
        ",
    },
];

/// Auxiliary tables created outside the managed schema.
const UNMANAGED_TABLES: [TableDdl; 2] = [
    TableDdl {
        name: "invoice_templates",
        postgres: r"
            CREATE TABLE IF NOT EXISTS invoice_templates (
                template_id BIGSERIAL PRIMARY KEY,
                template_name TEXT NOT NULL,
                template_layout TEXT NOT NULL,
                is_default BOOLEAN NOT NULL DEFAULT FALSE,
                created_date TIMESTAMP WITH TIME ZONE NULL
            );
        ",
        sqlite: r"
            CREATE TABLE IF NOT EXISTS invoice_templates (
                template_id INTEGER PRIMARY KEY AUTOINCREMENT,
                template_name TEXT NOT NULL,
                template_layout TEXT NOT NULL,
                is_default BOOLEAN NOT NULL DEFAULT FALSE,
                created_date TEXT NULL
            );
        ",
    },
    TableDdl {
        name: "users_activity_logs",
        postgres: r"
            CREATE TABLE IF NOT EXISTS users_activity_logs (
                activity_id BIGSERIAL PRIMARY KEY,
                user_id CHAR(12) NOT NULL,
                activity_type VARCHAR(200) NOT NULL,
                timestamp TIMESTAMP WITH TIME ZONE NOT NULL,
                related_invoice VARCHAR(200)
            );
        ",
        sqlite: r"
            CREATE TABLE IF NOT EXISTS users_activity_logs (
                activity_id INTEGER PRIMARY KEY AUTOINCREMENT,
                user_id TEXT NOT NULL,
                activity_type VARCHAR(200) NOT NULL,
                timestamp TEXT NOT NULL,
                related_invoice VARCHAR(200)
            );
        ",
    },
];

async fn ensure(db: &DbPool, tables: &[TableDdl]) -> Result<Vec<&'static str>> {
    let mut ensured = Vec::with_capacity(tables.len());
    for table in tables {
        let ddl = match db.backend() {
            DatabaseBackend::Postgres => table.postgres,
            DatabaseBackend::Sqlite => table.sqlite,
        };
        with_pool!(db, pool => {
            sqlx::query(ddl).execute(pool).await?;
        });
        info!("Ensured table: {}", table.name);
        ensured.push(table.name);
    }
    Ok(ensured)
}

/// Ensure the managed schema exists. Returns the table names touched, in
/// creation order.
pub async fn ensure_managed_tables(db: &DbPool) -> Result<Vec<&'static str>> {
    ensure(db, &MANAGED_TABLES).await
}

/// Ensure the two auxiliary tables (`invoice_templates`,
/// `users_activity_logs`) exist.
pub async fn ensure_unmanaged_tables(db: &DbPool) -> Result<Vec<&'static str>> {
    ensure(db, &UNMANAGED_TABLES).await
}
