//! Legacy logo migration.
//!
//! One-time copy of file-backed logo images into the blob columns of
//! `business_profiles` and `invoices`. Idempotent: only rows with a legacy
//! storage key and an empty blob column are touched, so re-running after a
//! partial failure resumes where the previous run left off.

use bytes::Bytes;
use tracing::{debug, info, warn};

use crate::db::DbPool;
use crate::repository::{BusinessProfileRepository, InvoiceRepository};
use crate::storage::MediaStorage;
use crate::Result;

/// Summary of one backfill run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BackfillReport {
    pub profiles_updated: u64,
    pub invoices_updated: u64,
    /// Rows whose storage read or database update failed. These are logged
    /// and skipped; the run continues.
    pub failed: u64,
}

/// Infer the MIME type from the storage key's file extension.
fn guess_mime(key: &str) -> Option<String> {
    mime_guess::from_path(key).first_raw().map(str::to_string)
}

/// Read one logo from storage. `Ok(None)` when the backend has no object for
/// the key; such rows are left untouched for a later run, matching legacy
/// data whose media is partially missing.
async fn load_logo(
    storage: &dyn MediaStorage,
    key: &str,
) -> std::io::Result<Option<(Bytes, Option<String>)>> {
    if !storage.exists(key).await? {
        return Ok(None);
    }
    let data = storage.read(key).await?;
    let mime = guess_mime(key);
    Ok(Some((data, mime)))
}

/// Copy logo bytes from media storage into the blob columns.
///
/// Per-row failures are logged as warnings and counted; rows that already
/// succeeded are never rolled back.
pub async fn populate_logo_blobs(
    db: &DbPool,
    storage: &dyn MediaStorage,
) -> Result<BackfillReport> {
    let profiles = BusinessProfileRepository::new(db.clone());
    let invoices = InvoiceRepository::new(db.clone());

    let mut report = BackfillReport::default();

    for (id, key) in profiles.logo_backfill_candidates().await? {
        let loaded = match load_logo(storage, &key).await {
            Ok(loaded) => loaded,
            Err(e) => {
                warn!("Failed to read logo for business profile {id} (key: {key}): {e}");
                report.failed += 1;
                continue;
            }
        };
        let Some((data, mime)) = loaded else {
            debug!("No stored file for business profile {id} (key: {key})");
            continue;
        };
        match profiles.set_logo_blob(&id, &data, mime.as_deref()).await {
            Ok(updated) => report.profiles_updated += updated,
            Err(e) => {
                warn!("Failed to copy logo for business profile {id}: {e}");
                report.failed += 1;
            }
        }
    }

    for (id, key) in invoices.logo_backfill_candidates().await? {
        let loaded = match load_logo(storage, &key).await {
            Ok(loaded) => loaded,
            Err(e) => {
                warn!("Failed to read logo for invoice {id} (key: {key}): {e}");
                report.failed += 1;
                continue;
            }
        };
        let Some((data, mime)) = loaded else {
            debug!("No stored file for invoice {id} (key: {key})");
            continue;
        };
        match invoices.set_logo_blob(&id, &data, mime.as_deref()).await {
            Ok(updated) => report.invoices_updated += updated,
            Err(e) => {
                warn!("Failed to copy logo for invoice {id}: {e}");
                report.failed += 1;
            }
        }
    }

    info!(
        "Logo backfill finished: business profiles={}, invoices={}, failed={}",
        report.profiles_updated, report.invoices_updated, report.failed
    );

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_guess_mime() {
        assert_eq!(guess_mime("logos/acme.png").as_deref(), Some("image/png"));
        assert_eq!(guess_mime("logos/acme.jpg").as_deref(), Some("image/jpeg"));
        assert_eq!(guess_mime("logos/acme.svg").as_deref(), Some("image/svg+xml"));
        assert_eq!(guess_mime("logos/acme"), None);
    }
}
