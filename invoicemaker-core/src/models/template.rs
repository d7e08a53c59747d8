use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A reusable invoice layout, stored in the auxiliary `invoice_templates`
/// table. At most one template is flagged as the default.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct InvoiceTemplate {
    pub template_id: i64,
    pub template_name: String,
    pub template_layout: String,
    pub is_default: bool,
    pub created_date: Option<DateTime<Utc>>,
}
