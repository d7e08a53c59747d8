//! Integration tests for invoicemaker-core
//!
//! These run against an in-memory SQLite pool plus the in-memory media
//! storage backend, covering the schema bootstrap, the logo blob backfill,
//! and superuser provisioning end to end.
//!
//! Run with: cargo test --test integration_tests

use std::str::FromStr;
use std::time::Duration;

use bytes::Bytes;
use chrono::NaiveDate;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};

use invoicemaker_core::{
    bootstrap::{provision_superuser, ProvisionOutcome, DEV_DEFAULT_PASSWORD},
    models::{BusinessProfile, Invoice, UserId},
    repository::{
        ActivityLogRepository, BusinessProfileRepository, InvoiceRepository,
        InvoiceTemplateRepository, UserRepository,
    },
    schema,
    service::{populate_logo_blobs, verify_password, BackfillReport},
    storage::{MediaStorage, MemoryStorage},
    Config, DbPool, Error,
};

/// Fresh in-memory database. A single connection keeps every query on the
/// same SQLite memory instance.
async fn test_db() -> DbPool {
    let options = SqliteConnectOptions::from_str("sqlite::memory:").expect("valid sqlite url");
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect_with(options)
        .await
        .expect("connect to in-memory sqlite");
    DbPool::Sqlite(pool)
}

fn test_config() -> Config {
    let mut config = Config::default();
    config.debug = true;
    config
}

#[tokio::test]
async fn test_unmanaged_table_bootstrap_is_idempotent() {
    let db = test_db().await;

    let first = schema::ensure_unmanaged_tables(&db).await.unwrap();
    assert_eq!(first, vec!["invoice_templates", "users_activity_logs"]);

    // Rows written between runs must survive a re-run untouched.
    let templates = InvoiceTemplateRepository::new(db.clone());
    let created = templates.create("Classic", "{{ invoice }}", true).await.unwrap();

    let second = schema::ensure_unmanaged_tables(&db).await.unwrap();
    assert_eq!(first, second);

    let listed = templates.list().await.unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].template_id, created.template_id);
    assert!(listed[0].is_default);
}

#[tokio::test]
async fn test_managed_schema_bootstrap_is_idempotent() {
    let db = test_db().await;

    let first = schema::ensure_managed_tables(&db).await.unwrap();
    assert_eq!(first, vec!["users", "business_profiles", "invoices"]);

    let profiles = BusinessProfileRepository::new(db.clone());
    let profile = BusinessProfile::new("Acme GmbH".to_string());
    profiles.create(&profile).await.unwrap();

    schema::ensure_managed_tables(&db).await.unwrap();

    let reloaded = profiles.get(&profile.id).await.unwrap().unwrap();
    assert_eq!(reloaded.name, "Acme GmbH");
    assert_eq!(profiles.list().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_logo_backfill_copies_bytes_and_mime() {
    let db = test_db().await;
    schema::ensure_managed_tables(&db).await.unwrap();

    let storage = MemoryStorage::new();
    let profile_logo = Bytes::from_static(b"\x89PNG\r\n\x1a\nfake profile logo");
    let invoice_logo = Bytes::from_static(b"\xff\xd8\xfffake invoice logo");
    storage.write("logos/acme.png", profile_logo.clone()).await.unwrap();
    storage.write("logos/acme.jpg", invoice_logo.clone()).await.unwrap();

    let profiles = BusinessProfileRepository::new(db.clone());
    let mut profile = BusinessProfile::new("Acme GmbH".to_string());
    profile.logo = Some("logos/acme.png".to_string());
    profiles.create(&profile).await.unwrap();

    // A profile without a legacy logo is never a candidate.
    profiles
        .create(&BusinessProfile::new("No Logo Ltd".to_string()))
        .await
        .unwrap();

    let invoices = InvoiceRepository::new(db.clone());
    let mut invoice = Invoice::new(
        "INV-2024-0001".to_string(),
        "Globex Corp".to_string(),
        NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
    );
    invoice.business_logo = Some("logos/acme.jpg".to_string());
    invoices.create(&invoice).await.unwrap();

    // A row whose media file is gone is skipped, not failed.
    let mut orphan = Invoice::new(
        "INV-2024-0002".to_string(),
        "Initech".to_string(),
        NaiveDate::from_ymd_opt(2024, 3, 2).unwrap(),
    );
    orphan.business_logo = Some("logos/long-gone.png".to_string());
    invoices.create(&orphan).await.unwrap();

    let report = populate_logo_blobs(&db, &storage).await.unwrap();
    assert_eq!(report.profiles_updated, 1);
    assert_eq!(report.invoices_updated, 1);
    assert_eq!(report.failed, 0);

    let stored_profile = profiles.get(&profile.id).await.unwrap().unwrap();
    assert_eq!(stored_profile.logo_blob.as_deref(), Some(&profile_logo[..]));
    assert_eq!(stored_profile.logo_mime.as_deref(), Some("image/png"));
    assert!(!stored_profile.needs_logo_backfill());

    let stored_invoice = invoices.get(&invoice.id).await.unwrap().unwrap();
    assert_eq!(stored_invoice.business_logo_blob.as_deref(), Some(&invoice_logo[..]));
    assert_eq!(stored_invoice.business_logo_mime.as_deref(), Some("image/jpeg"));

    let stored_orphan = invoices.get(&orphan.id).await.unwrap().unwrap();
    assert!(stored_orphan.business_logo_blob.is_none());
    assert!(stored_orphan.needs_logo_backfill());

    // Newest-first listing sees both invoices.
    assert_eq!(invoices.list().await.unwrap().len(), 2);
}

#[tokio::test]
async fn test_logo_backfill_second_run_changes_nothing() {
    let db = test_db().await;
    schema::ensure_managed_tables(&db).await.unwrap();

    let storage = MemoryStorage::new();
    storage
        .write("logos/acme.png", Bytes::from_static(b"logo bytes"))
        .await
        .unwrap();

    let profiles = BusinessProfileRepository::new(db.clone());
    let mut profile = BusinessProfile::new("Acme GmbH".to_string());
    profile.logo = Some("logos/acme.png".to_string());
    profiles.create(&profile).await.unwrap();

    let first = populate_logo_blobs(&db, &storage).await.unwrap();
    assert_eq!(first.profiles_updated, 1);

    let second = populate_logo_blobs(&db, &storage).await.unwrap();
    assert_eq!(second, BackfillReport::default());

    // The blob written by the first run is untouched.
    let stored = profiles.get(&profile.id).await.unwrap().unwrap();
    assert_eq!(stored.logo_blob.as_deref(), Some(&b"logo bytes"[..]));
}

#[tokio::test]
async fn test_provision_creates_exactly_one_admin() {
    let db = test_db().await;
    schema::ensure_managed_tables(&db).await.unwrap();

    let mut config = test_config();
    config.superuser.password = Some("s3cret-first".to_string());

    let outcome = provision_superuser(&db, &config).await.unwrap();
    match outcome {
        ProvisionOutcome::Created {
            ref username,
            used_default_password,
            ..
        } => {
            assert_eq!(username, "admin");
            assert!(!used_default_password);
        }
        other => panic!("expected Created, got {other:?}"),
    }

    let users = UserRepository::new(db.clone());
    assert_eq!(users.count().await.unwrap(), 1);

    let user = users.get_by_username("admin").await.unwrap().unwrap();
    assert!(user.is_admin());
    assert_eq!(user.email.as_deref(), Some("admin@example.com"));
    assert!(verify_password("s3cret-first", &user.password_hash).await.unwrap());

    // Existing account + explicit override: only the password changes.
    config.superuser.password = Some("s3cret-rotated".to_string());
    let outcome = provision_superuser(&db, &config).await.unwrap();
    assert!(matches!(outcome, ProvisionOutcome::PasswordUpdated { .. }));

    assert_eq!(users.count().await.unwrap(), 1);
    let updated = users.get_by_username("admin").await.unwrap().unwrap();
    assert_eq!(updated.id, user.id);
    assert_eq!(updated.email, user.email);
    assert_eq!(updated.role, user.role);
    assert!(verify_password("s3cret-rotated", &updated.password_hash).await.unwrap());

    // Existing account, no override: nothing happens.
    config.superuser.password = None;
    let outcome = provision_superuser(&db, &config).await.unwrap();
    assert!(matches!(outcome, ProvisionOutcome::Unchanged { .. }));
    assert!(verify_password("s3cret-rotated", &updated.password_hash).await.unwrap());
}

#[tokio::test]
async fn test_provision_default_password_only_in_debug() {
    let db = test_db().await;
    schema::ensure_managed_tables(&db).await.unwrap();

    // Debug off, no password: provisioning refuses.
    let mut config = test_config();
    config.debug = false;
    config.superuser.password = None;
    let err = provision_superuser(&db, &config).await.unwrap_err();
    assert!(matches!(err, Error::InvalidInput(_)));
    assert_eq!(UserRepository::new(db.clone()).count().await.unwrap(), 0);

    // Debug on: the development default is used and flagged.
    config.debug = true;
    let outcome = provision_superuser(&db, &config).await.unwrap();
    match outcome {
        ProvisionOutcome::Created {
            password,
            used_default_password,
            ..
        } => {
            assert_eq!(password, DEV_DEFAULT_PASSWORD);
            assert!(used_default_password);
        }
        other => panic!("expected Created, got {other:?}"),
    }
}

#[tokio::test]
async fn test_template_default_is_unique() {
    let db = test_db().await;
    schema::ensure_unmanaged_tables(&db).await.unwrap();

    let templates = InvoiceTemplateRepository::new(db.clone());
    let classic = templates.create("Classic", "{{ classic }}", true).await.unwrap();
    let modern = templates.create("Modern", "{{ modern }}", true).await.unwrap();

    // Creating a second default demotes the first.
    let default = templates.default_template().await.unwrap().unwrap();
    assert_eq!(default.template_id, modern.template_id);

    templates.set_default(classic.template_id).await.unwrap();
    let default = templates.default_template().await.unwrap().unwrap();
    assert_eq!(default.template_id, classic.template_id);

    let fetched = templates.get(modern.template_id).await.unwrap().unwrap();
    assert!(!fetched.is_default);

    let defaults = templates
        .list()
        .await
        .unwrap()
        .into_iter()
        .filter(|t| t.is_default)
        .count();
    assert_eq!(defaults, 1);

    let missing = templates.set_default(9999).await.unwrap_err();
    assert!(matches!(missing, Error::NotFound(_)));
}

#[tokio::test]
async fn test_activity_log_records_and_lists_newest_first() {
    let db = test_db().await;
    schema::ensure_unmanaged_tables(&db).await.unwrap();

    let activities = ActivityLogRepository::new(db.clone());
    let user_id = UserId::new();

    let first = activities
        .record(&user_id, "invoice_created", Some("INV-2024-0001"))
        .await
        .unwrap();
    tokio::time::sleep(Duration::from_millis(10)).await;
    let second = activities.record(&user_id, "login", None).await.unwrap();

    assert_ne!(first.activity_id, second.activity_id);

    let recent = activities.recent(10).await.unwrap();
    assert_eq!(recent.len(), 2);
    assert_eq!(recent[0].activity_id, second.activity_id);
    assert_eq!(recent[1].related_invoice.as_deref(), Some("INV-2024-0001"));

    let limited = activities.recent(1).await.unwrap();
    assert_eq!(limited.len(), 1);
    assert_eq!(limited[0].activity_type, "login");
}
