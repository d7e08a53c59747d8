use anyhow::Result;

use invoicemaker_core::{schema, DbPool};

/// Create the auxiliary tables (`invoice_templates`, `users_activity_logs`)
/// if they do not exist. Safe to run any number of times.
pub async fn run(db: &DbPool) -> Result<()> {
    for table in schema::ensure_unmanaged_tables(db).await? {
        println!("Ensured table: {table}");
    }
    println!("create-unmanaged-tables completed.");
    Ok(())
}
