use chrono::Utc;

use crate::db::{with_pool, DbPool};
use crate::models::{User, UserId};
use crate::{Error, Result};

/// User repository for database operations
#[derive(Clone)]
pub struct UserRepository {
    db: DbPool,
}

impl UserRepository {
    #[must_use]
    pub const fn new(db: DbPool) -> Self {
        Self { db }
    }

    /// Create a new user
    pub async fn create(&self, user: &User) -> Result<()> {
        const SQL: &str = r"
            INSERT INTO users (id, username, email, password_hash, role, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
        ";
        with_pool!(&self.db, pool => {
            sqlx::query(SQL)
                .bind(user.id.as_str())
                .bind(&user.username)
                .bind(user.email.as_ref())
                .bind(&user.password_hash)
                .bind(user.role.as_str())
                .bind(user.created_at)
                .bind(user.updated_at)
                .execute(pool)
                .await
                .map_err(|e| match &e {
                    sqlx::Error::Database(db_err)
                        if matches!(db_err.kind(), sqlx::error::ErrorKind::UniqueViolation) =>
                    {
                        Error::AlreadyExists(format!("User '{}' already exists", user.username))
                    }
                    _ => Error::from(e),
                })?;
        });
        Ok(())
    }

    /// Get user by username
    pub async fn get_by_username(&self, username: &str) -> Result<Option<User>> {
        const SQL: &str = r"
            SELECT id, username, email, password_hash, role, created_at, updated_at
            FROM users
            WHERE username = $1
        ";
        let user = with_pool!(&self.db, pool => {
            sqlx::query_as::<_, User>(SQL)
                .bind(username)
                .fetch_optional(pool)
                .await?
        });
        Ok(user)
    }

    /// Update user password
    pub async fn update_password(&self, user_id: &UserId, password_hash: &str) -> Result<()> {
        const SQL: &str = r"
            UPDATE users
            SET password_hash = $1, updated_at = $2
            WHERE id = $3
        ";
        let updated = with_pool!(&self.db, pool => {
            sqlx::query(SQL)
                .bind(password_hash)
                .bind(Utc::now())
                .bind(user_id.as_str())
                .execute(pool)
                .await?
                .rows_affected()
        });
        if updated == 0 {
            return Err(Error::NotFound(format!("user {user_id}")));
        }
        Ok(())
    }

    /// Count all user accounts
    pub async fn count(&self) -> Result<i64> {
        const SQL: &str = "SELECT COUNT(*) FROM users";
        let count = with_pool!(&self.db, pool => {
            sqlx::query_scalar::<_, i64>(SQL).fetch_one(pool).await?
        });
        Ok(count)
    }
}
