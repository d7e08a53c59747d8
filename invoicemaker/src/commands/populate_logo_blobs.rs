use anyhow::Result;

use invoicemaker_core::{service, storage, Config, DbPool};

/// Copy legacy logo files from media storage into the blob columns of
/// business profiles and invoices. Idempotent; re-runs report zero updates.
pub async fn run(config: &Config, db: &DbPool) -> Result<()> {
    let storage = storage::from_config(&config.storage)?;

    let report = service::populate_logo_blobs(db, storage.as_ref()).await?;

    println!(
        "Copied logos: business profiles={}, invoices={}",
        report.profiles_updated, report.invoices_updated
    );
    if report.failed > 0 {
        println!("{} row(s) failed and were skipped; see the log.", report.failed);
    }
    Ok(())
}
