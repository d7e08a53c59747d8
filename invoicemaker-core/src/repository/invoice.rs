use chrono::Utc;

use crate::db::{with_pool, DbPool};
use crate::models::{Invoice, InvoiceId};
use crate::Result;

#[derive(Clone)]
pub struct InvoiceRepository {
    db: DbPool,
}

impl InvoiceRepository {
    #[must_use]
    pub const fn new(db: DbPool) -> Self {
        Self { db }
    }

    pub async fn create(&self, invoice: &Invoice) -> Result<()> {
        const SQL: &str = r"
            INSERT INTO invoices
                (id, invoice_number, client_name, issue_date, due_date, line_items,
                 subtotal, tax, total, business_logo, business_logo_blob,
                 business_logo_mime, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
        ";
        with_pool!(&self.db, pool => {
            sqlx::query(SQL)
                .bind(invoice.id.as_str())
                .bind(&invoice.invoice_number)
                .bind(&invoice.client_name)
                .bind(invoice.issue_date)
                .bind(invoice.due_date)
                .bind(&invoice.line_items)
                .bind(invoice.subtotal)
                .bind(invoice.tax)
                .bind(invoice.total)
                .bind(invoice.business_logo.as_ref())
                .bind(invoice.business_logo_blob.as_deref())
                .bind(invoice.business_logo_mime.as_ref())
                .bind(invoice.created_at)
                .bind(invoice.updated_at)
                .execute(pool)
                .await?;
        });
        Ok(())
    }

    pub async fn get(&self, id: &InvoiceId) -> Result<Option<Invoice>> {
        const SQL: &str = r"
            SELECT id, invoice_number, client_name, issue_date, due_date, line_items,
                   subtotal, tax, total, business_logo, business_logo_blob,
                   business_logo_mime, created_at, updated_at
            FROM invoices
            WHERE id = $1
        ";
        let invoice = with_pool!(&self.db, pool => {
            sqlx::query_as::<_, Invoice>(SQL)
                .bind(id.as_str())
                .fetch_optional(pool)
                .await?
        });
        Ok(invoice)
    }

    pub async fn list(&self) -> Result<Vec<Invoice>> {
        const SQL: &str = r"
            SELECT id, invoice_number, client_name, issue_date, due_date, line_items,
                   subtotal, tax, total, business_logo, business_logo_blob,
                   business_logo_mime, created_at, updated_at
            FROM invoices
            ORDER BY created_at DESC
        ";
        let invoices = with_pool!(&self.db, pool => {
            sqlx::query_as::<_, Invoice>(SQL).fetch_all(pool).await?
        });
        Ok(invoices)
    }

    /// Rows that still reference a legacy logo file and have no blob yet.
    pub async fn logo_backfill_candidates(&self) -> Result<Vec<(InvoiceId, String)>> {
        const SQL: &str = r"
            SELECT id, business_logo
            FROM invoices
            WHERE business_logo IS NOT NULL AND business_logo != '' AND business_logo_blob IS NULL
            ORDER BY created_at
        ";
        let candidates = with_pool!(&self.db, pool => {
            sqlx::query_as::<_, (InvoiceId, String)>(SQL).fetch_all(pool).await?
        });
        Ok(candidates)
    }

    /// Persist the backfilled blob. Guarded on `business_logo_blob IS NULL`
    /// so re-runs never rewrite a populated row. Returns the number of rows
    /// updated (0 or 1).
    pub async fn set_logo_blob(
        &self,
        id: &InvoiceId,
        blob: &[u8],
        mime: Option<&str>,
    ) -> Result<u64> {
        const SQL: &str = r"
            UPDATE invoices
            SET business_logo_blob = $1, business_logo_mime = $2, updated_at = $3
            WHERE id = $4 AND business_logo_blob IS NULL
        ";
        let updated = with_pool!(&self.db, pool => {
            sqlx::query(SQL)
                .bind(blob)
                .bind(mime)
                .bind(Utc::now())
                .bind(id.as_str())
                .execute(pool)
                .await?
                .rows_affected()
        });
        Ok(updated)
    }
}
