use chrono::Utc;

use crate::db::{with_pool, DbPool};
use crate::models::InvoiceTemplate;
use crate::{Error, Result};

#[derive(Clone)]
pub struct InvoiceTemplateRepository {
    db: DbPool,
}

impl InvoiceTemplateRepository {
    #[must_use]
    pub const fn new(db: DbPool) -> Self {
        Self { db }
    }

    /// Create a template. When `is_default` is set, any previous default is
    /// cleared in the same transaction so at most one default exists.
    pub async fn create(
        &self,
        template_name: &str,
        template_layout: &str,
        is_default: bool,
    ) -> Result<InvoiceTemplate> {
        const CLEAR: &str =
            "UPDATE invoice_templates SET is_default = FALSE WHERE is_default = TRUE";
        const INSERT: &str = r"
            INSERT INTO invoice_templates (template_name, template_layout, is_default, created_date)
            VALUES ($1, $2, $3, $4)
            RETURNING template_id
        ";
        let created_date = Utc::now();
        let template_id = with_pool!(&self.db, pool => {
            let mut tx = pool.begin().await?;
            if is_default {
                sqlx::query(CLEAR).execute(&mut *tx).await?;
            }
            let id: i64 = sqlx::query_scalar(INSERT)
                .bind(template_name)
                .bind(template_layout)
                .bind(is_default)
                .bind(created_date)
                .fetch_one(&mut *tx)
                .await?;
            tx.commit().await?;
            id
        });
        Ok(InvoiceTemplate {
            template_id,
            template_name: template_name.to_string(),
            template_layout: template_layout.to_string(),
            is_default,
            created_date: Some(created_date),
        })
    }

    pub async fn get(&self, template_id: i64) -> Result<Option<InvoiceTemplate>> {
        const SQL: &str = r"
            SELECT template_id, template_name, template_layout, is_default, created_date
            FROM invoice_templates
            WHERE template_id = $1
        ";
        let template = with_pool!(&self.db, pool => {
            sqlx::query_as::<_, InvoiceTemplate>(SQL)
                .bind(template_id)
                .fetch_optional(pool)
                .await?
        });
        Ok(template)
    }

    pub async fn list(&self) -> Result<Vec<InvoiceTemplate>> {
        const SQL: &str = r"
            SELECT template_id, template_name, template_layout, is_default, created_date
            FROM invoice_templates
            ORDER BY template_name
        ";
        let templates = with_pool!(&self.db, pool => {
            sqlx::query_as::<_, InvoiceTemplate>(SQL).fetch_all(pool).await?
        });
        Ok(templates)
    }

    pub async fn default_template(&self) -> Result<Option<InvoiceTemplate>> {
        const SQL: &str = r"
            SELECT template_id, template_name, template_layout, is_default, created_date
            FROM invoice_templates
            WHERE is_default = TRUE
        ";
        let template = with_pool!(&self.db, pool => {
            sqlx::query_as::<_, InvoiceTemplate>(SQL).fetch_optional(pool).await?
        });
        Ok(template)
    }

    /// Make `template_id` the sole default.
    pub async fn set_default(&self, template_id: i64) -> Result<()> {
        const CLEAR: &str =
            "UPDATE invoice_templates SET is_default = FALSE WHERE is_default = TRUE";
        const SET: &str =
            "UPDATE invoice_templates SET is_default = TRUE WHERE template_id = $1";
        let updated = with_pool!(&self.db, pool => {
            let mut tx = pool.begin().await?;
            sqlx::query(CLEAR).execute(&mut *tx).await?;
            let updated = sqlx::query(SET)
                .bind(template_id)
                .execute(&mut *tx)
                .await?
                .rows_affected();
            tx.commit().await?;
            updated
        });
        if updated == 0 {
            return Err(Error::NotFound(format!("invoice template {template_id}")));
        }
        Ok(())
    }
}
