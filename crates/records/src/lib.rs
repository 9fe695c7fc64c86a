//! # Snapset Records
//!
//! Documents exchanged with the preferences database and the local data
//! directories.
//!
//! ## Flow
//!
//! ```text
//! findSnapsetPrefsSafes view ──> mark_snapshots_for_deletion ──┐
//!                                                               ├──> bulk delete batch
//! findAllGpiiKeys view ───────> mark_keys_for_deletion ────────┘
//!
//! build data dir + demo user dir ──> load_directory ──> bulk upload batch
//! ```

mod bulk;
mod document;
mod error;
mod loader;
mod matcher;
mod view;

pub use bulk::{encode_bulk_docs, BulkDocResult, BulkDocsBody};
pub use document::Document;
pub use error::{RecordsError, Result};
pub use loader::load_directory;
pub use matcher::{mark_keys_for_deletion, mark_snapshots_for_deletion};
pub use view::{ViewResponse, ViewRow};
