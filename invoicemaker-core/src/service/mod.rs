pub mod backfill;
pub mod password;

pub use backfill::{populate_logo_blobs, BackfillReport};
pub use password::{hash_password, verify_password};
