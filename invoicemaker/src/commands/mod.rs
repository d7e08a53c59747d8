//! Management commands.
//!
//! Each command is a single linear pass that runs to completion and exits;
//! they share nothing beyond the database pool. Human-readable status lines
//! go to stdout, diagnostics to the tracing log.

pub mod create_superuser;
pub mod create_unmanaged_tables;
pub mod migrate;
pub mod populate_logo_blobs;
