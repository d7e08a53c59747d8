use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::id::ProfileId;

/// A business identity that invoices are issued under.
///
/// `logo` holds the legacy media-storage key of the uploaded logo; once the
/// blob backfill has run, `logo_blob`/`logo_mime` carry the same image
/// inline so rendering no longer depends on the storage backend.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct BusinessProfile {
    pub id: ProfileId,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub logo: Option<String>,
    #[serde(skip_serializing)]
    pub logo_blob: Option<Vec<u8>>,
    pub logo_mime: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl BusinessProfile {
    #[must_use]
    pub fn new(name: String) -> Self {
        let now = Utc::now();
        Self {
            id: ProfileId::new(),
            name,
            email: None,
            phone: None,
            address: None,
            logo: None,
            logo_blob: None,
            logo_mime: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Whether this row still needs the logo blob backfill.
    #[must_use]
    pub fn needs_logo_backfill(&self) -> bool {
        self.logo.as_deref().is_some_and(|l| !l.is_empty()) && self.logo_blob.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backfill_eligibility() {
        let mut profile = BusinessProfile::new("Acme GmbH".to_string());
        assert!(!profile.needs_logo_backfill());

        profile.logo = Some("logos/acme.png".to_string());
        assert!(profile.needs_logo_backfill());

        profile.logo_blob = Some(vec![1, 2, 3]);
        assert!(!profile.needs_logo_backfill());
    }
}
