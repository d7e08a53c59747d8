use anyhow::Result;

use invoicemaker_core::{schema, DbPool};

/// Ensure the managed schema exists. Safe to run any number of times.
pub async fn run(db: &DbPool) -> Result<()> {
    for table in schema::ensure_managed_tables(db).await? {
        println!("Ensured table: {table}");
    }
    println!("migrate completed.");
    Ok(())
}
