use chrono::Utc;

use crate::db::{with_pool, DbPool};
use crate::models::{BusinessProfile, ProfileId};
use crate::Result;

#[derive(Clone)]
pub struct BusinessProfileRepository {
    db: DbPool,
}

impl BusinessProfileRepository {
    #[must_use]
    pub const fn new(db: DbPool) -> Self {
        Self { db }
    }

    pub async fn create(&self, profile: &BusinessProfile) -> Result<()> {
        const SQL: &str = r"
            INSERT INTO business_profiles
                (id, name, email, phone, address, logo, logo_blob, logo_mime, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
        ";
        with_pool!(&self.db, pool => {
            sqlx::query(SQL)
                .bind(profile.id.as_str())
                .bind(&profile.name)
                .bind(profile.email.as_ref())
                .bind(profile.phone.as_ref())
                .bind(profile.address.as_ref())
                .bind(profile.logo.as_ref())
                .bind(profile.logo_blob.as_deref())
                .bind(profile.logo_mime.as_ref())
                .bind(profile.created_at)
                .bind(profile.updated_at)
                .execute(pool)
                .await?;
        });
        Ok(())
    }

    pub async fn get(&self, id: &ProfileId) -> Result<Option<BusinessProfile>> {
        const SQL: &str = r"
            SELECT id, name, email, phone, address, logo, logo_blob, logo_mime, created_at, updated_at
            FROM business_profiles
            WHERE id = $1
        ";
        let profile = with_pool!(&self.db, pool => {
            sqlx::query_as::<_, BusinessProfile>(SQL)
                .bind(id.as_str())
                .fetch_optional(pool)
                .await?
        });
        Ok(profile)
    }

    pub async fn list(&self) -> Result<Vec<BusinessProfile>> {
        const SQL: &str = r"
            SELECT id, name, email, phone, address, logo, logo_blob, logo_mime, created_at, updated_at
            FROM business_profiles
            ORDER BY name
        ";
        let profiles = with_pool!(&self.db, pool => {
            sqlx::query_as::<_, BusinessProfile>(SQL).fetch_all(pool).await?
        });
        Ok(profiles)
    }

    /// Rows that still reference a legacy logo file and have no blob yet.
    pub async fn logo_backfill_candidates(&self) -> Result<Vec<(ProfileId, String)>> {
        const SQL: &str = r"
            SELECT id, logo
            FROM business_profiles
            WHERE logo IS NOT NULL AND logo != '' AND logo_blob IS NULL
            ORDER BY created_at
        ";
        let candidates = with_pool!(&self.db, pool => {
            sqlx::query_as::<_, (ProfileId, String)>(SQL).fetch_all(pool).await?
        });
        Ok(candidates)
    }

    /// Persist the backfilled blob. The `logo_blob IS NULL` guard keeps the
    /// operation idempotent: a row that already carries a blob is never
    /// rewritten. Returns the number of rows updated (0 or 1).
    pub async fn set_logo_blob(
        &self,
        id: &ProfileId,
        blob: &[u8],
        mime: Option<&str>,
    ) -> Result<u64> {
        const SQL: &str = r"
            UPDATE business_profiles
            SET logo_blob = $1, logo_mime = $2, updated_at = $3
            WHERE id = $4 AND logo_blob IS NULL
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
