use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;

use super::id::InvoiceId;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    pub description: String,
    pub quantity: f64,
    pub unit_price: f64,
}

impl LineItem {
    #[must_use]
    pub fn amount(&self) -> f64 {
        self.quantity * self.unit_price
    }
}

/// An issued invoice.
///
/// Carries a denormalized copy of the business logo (`business_logo` is the
/// legacy storage key, `business_logo_blob`/`business_logo_mime` the inline
/// copy written by the backfill) so an invoice keeps rendering identically
/// even after the profile's logo changes.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Invoice {
    pub id: InvoiceId,
    pub invoice_number: String,
    pub client_name: String,
    pub issue_date: NaiveDate,
    pub due_date: Option<NaiveDate>,
    pub line_items: Json<Vec<LineItem>>,
    pub subtotal: f64,
    pub tax: f64,
    pub total: f64,
    pub business_logo: Option<String>,
    #[serde(skip_serializing)]
    pub business_logo_blob: Option<Vec<u8>>,
    pub business_logo_mime: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Invoice {
    #[must_use]
    pub fn new(invoice_number: String, client_name: String, issue_date: NaiveDate) -> Self {
        let now = Utc::now();
        Self {
            id: InvoiceId::new(),
            invoice_number,
            client_name,
            issue_date,
            due_date: None,
            line_items: Json(Vec::new()),
            subtotal: 0.0,
            tax: 0.0,
            total: 0.0,
            business_logo: None,
            business_logo_blob: None,
            business_logo_mime: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Recompute `subtotal` and `total` from the line items. `tax` is an
    /// absolute amount, not a rate.
    pub fn recalculate(&mut self) {
        self.subtotal = self.line_items.iter().map(LineItem::amount).sum();
        self.total = self.subtotal + self.tax;
    }

    /// Whether this row still needs the logo blob backfill.
    #[must_use]
    pub fn needs_logo_backfill(&self) -> bool {
        self.business_logo.as_deref().is_some_and(|l| !l.is_empty())
            && self.business_logo_blob.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_invoice() -> Invoice {
        Invoice::new(
            "INV-2024-0001".to_string(),
            "Globex Corp".to_string(),
            NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
        )
    }

    #[test]
    fn test_recalculate_totals() {
        let mut invoice = sample_invoice();
        invoice.line_items = Json(vec![
            LineItem {
                description: "Consulting".to_string(),
                quantity: 10.0,
                unit_price: 120.0,
            },
            LineItem {
                description: "Travel".to_string(),
                quantity: 1.0,
                unit_price: 300.0,
            },
        ]);
        invoice.tax = 285.0;
        invoice.recalculate();

        assert_eq!(invoice.subtotal, 1500.0);
        assert_eq!(invoice.total, 1785.0);
    }

    #[test]
    fn test_empty_invoice_totals_are_zero() {
        let mut invoice = sample_invoice();
        invoice.recalculate();
        assert_eq!(invoice.subtotal, 0.0);
        assert_eq!(invoice.total, 0.0);
    }
}
