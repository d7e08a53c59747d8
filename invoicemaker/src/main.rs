mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::info;

use invoicemaker_core::{
    bootstrap::{init_database, load_config},
    logging,
};

#[derive(Parser)]
#[command(name = "invoicemaker", version, about = "Invoice management back office")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Ensure the managed database schema exists (idempotent)
    Migrate,
    /// Create the auxiliary tables (invoice_templates, users_activity_logs) if missing
    CreateUnmanagedTables,
    /// Copy legacy logo files into database blob columns
    PopulateLogoBlobs,
    /// Create the administrative account, or update its password
    CreateSuperuser,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // 1. Load configuration (fails fast on validation errors)
    let config = load_config()?;

    // 2. Initialize logging
    logging::init_logging(&config.logging)?;
    info!("invoicemaker starting (debug mode: {})", config.debug);

    // 3. Initialize database
    let db = init_database(&config).await?;

    let result = match cli.command {
        Command::Migrate => commands::migrate::run(&db).await,
        Command::CreateUnmanagedTables => commands::create_unmanaged_tables::run(&db).await,
        Command::PopulateLogoBlobs => commands::populate_logo_blobs::run(&config, &db).await,
        Command::CreateSuperuser => commands::create_superuser::run(&config, &db).await,
    };

    db.close().await;
    result
}
