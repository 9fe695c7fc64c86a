use serde::Serialize;
use snapset_records::BulkDocResult;
use std::fmt;
use std::path::PathBuf;

pub const UPLOAD_CONFIRMATION: &str = "Uploaded latest snapsets and demo user preferences";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DeletionSummary {
    pub snapsets: usize,
    pub gpii_keys: usize,
}

impl fmt::Display for DeletionSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Deleted {} Prefs Safes and {} associated GPII Keys",
            self.snapsets, self.gpii_keys
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UploadSummary {
    pub build_data_dir: PathBuf,
    pub demo_user_dir: PathBuf,
    pub documents: usize,
}

impl UploadSummary {
    pub fn log(&self) {
        log::info!(
            "Bulk loading of build data from '{}'",
            self.build_data_dir.display()
        );
        log::info!(
            "Bulk loading of demo user data from '{}'",
            self.demo_user_dir.display()
        );
        log::info!("{UPLOAD_CONFIRMATION} ({} documents)", self.documents);
    }
}

/// What a completed run did.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PipelineReport {
    pub snapsets_found: usize,
    pub gpii_keys_found: usize,
    pub deleted: Option<DeletionSummary>,
    pub uploaded: Option<UploadSummary>,
    /// Documents the database refused in either bulk write.
    pub rejected: usize,
}

/// Count and log the per-document failures of a `_bulk_docs` response.
///
/// Only informational: a body that is not a result array is logged and
/// counted as zero failures.
pub fn bulk_failures(action: &str, body: &str) -> usize {
    let results = match BulkDocResult::parse_all(body) {
        Ok(results) => results,
        Err(err) => {
            log::warn!("Unreadable response while {action}: {err}");
            return 0;
        }
    };

    let failures = BulkDocResult::failures(&results);
    for failure in &failures {
        log::warn!(
            "{action}: document '{}' rejected: {} ({})",
            failure.id.as_deref().unwrap_or("?"),
            failure.error.as_deref().unwrap_or("unknown"),
            failure.reason.as_deref().unwrap_or("no reason given")
        );
    }
    if !failures.is_empty() {
        log::warn!(
            "{action}: {} of {} documents rejected",
            failures.len(),
            results.len()
        );
    }
    failures.len()
}
