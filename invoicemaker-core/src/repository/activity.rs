use chrono::Utc;

use crate::db::{with_pool, DbPool};
use crate::models::{ActivityLog, UserId};
use crate::Result;

#[derive(Clone)]
pub struct ActivityLogRepository {
    db: DbPool,
}

impl ActivityLogRepository {
    #[must_use]
    pub const fn new(db: DbPool) -> Self {
        Self { db }
    }

    /// Append an entry to the audit trail.
    pub async fn record(
        &self,
        user_id: &UserId,
        activity_type: &str,
        related_invoice: Option<&str>,
    ) -> Result<ActivityLog> {
        const SQL: &str = r"
            INSERT INTO users_activity_logs (user_id, activity_type, timestamp, related_invoice)
            VALUES ($1, $2, $3, $4)
            RETURNING activity_id
        ";
        let timestamp = Utc::now();
        let activity_id = with_pool!(&self.db, pool => {
            let id: i64 = sqlx::query_scalar(SQL)
                .bind(user_id.as_str())
                .bind(activity_type)
                .bind(timestamp)
                .bind(related_invoice)
                .fetch_one(pool)
                .await?;
            id
        });
        Ok(ActivityLog {
            activity_id,
            user_id: user_id.clone(),
            activity_type: activity_type.to_string(),
            timestamp,
            related_invoice: related_invoice.map(str::to_string),
        })
    }

    /// Most recent entries, newest first.
    pub async fn recent(&self, limit: i64) -> Result<Vec<ActivityLog>> {
        const SQL: &str = r"
            SELECT activity_id, user_id, activity_type, timestamp, related_invoice
            FROM users_activity_logs
            ORDER BY timestamp DESC
            LIMIT $1
        ";
        let entries = with_pool!(&self.db, pool => {
            sqlx::query_as::<_, ActivityLog>(SQL)
                .bind(limit)
                .fetch_all(pool)
                .await?
        });
        Ok(entries)
    }
}
