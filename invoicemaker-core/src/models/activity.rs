use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::id::UserId;

/// One audit trail entry, stored in the auxiliary `users_activity_logs`
/// table. `activity_type` is free-form ("invoice_created", "login", ...);
/// `related_invoice` carries the invoice number when the activity concerns
/// one.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct ActivityLog {
    pub activity_id: i64,
    pub user_id: UserId,
    pub activity_type: String,
    pub timestamp: DateTime<Utc>,
    pub related_invoice: Option<String>,
}
