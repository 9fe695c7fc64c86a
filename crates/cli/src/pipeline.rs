//! Fetch snapsets → fetch keys → batch delete → batch upload.
//!
//! Each step makes exactly one database round-trip and starts only once the
//! previous one succeeded. The first failure ends the run.

use crate::options::LoaderOptions;
use crate::report::{self, DeletionSummary, PipelineReport, UploadSummary};
use snapset_couch::{CouchEndpoints, CouchError, Gateway, HttpTransport, Transport};
use snapset_records::{
    load_directory, mark_keys_for_deletion, mark_snapshots_for_deletion, Document, RecordsError,
    ViewResponse,
};
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    FetchSnapshots,
    FetchKeys,
    BatchDelete,
    BatchUpload,
}

impl Step {
    /// Steps for one run, in execution order.
    pub fn plan(just_delete: bool) -> Vec<Self> {
        let mut steps = vec![Self::FetchSnapshots, Self::FetchKeys, Self::BatchDelete];
        if !just_delete {
            steps.push(Self::BatchUpload);
        }
        steps
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::FetchSnapshots => "fetch snapset Prefs Safes",
            Self::FetchKeys => "fetch GPII Keys",
            Self::BatchDelete => "batch delete",
            Self::BatchUpload => "batch upload",
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Error, Debug)]
pub enum StepError {
    #[error(transparent)]
    Couch(#[from] CouchError),

    #[error(transparent)]
    Records(#[from] RecordsError),
}

#[derive(Error, Debug)]
#[error("Step '{step}' failed: {source}")]
pub struct PipelineError {
    pub step: Step,
    #[source]
    pub source: StepError,
}

/// State owned by a single run.
///
/// `snapset_prefs_safes` and `gpii_keys` fill up during the fetch steps and
/// are read back to build the delete batch.
#[derive(Debug, Clone)]
pub struct PipelineContext {
    pub endpoints: CouchEndpoints,
    pub build_data_dir: PathBuf,
    pub demo_user_dir: PathBuf,
    pub just_delete: bool,
    pub snapset_prefs_safes: Vec<Document>,
    pub gpii_keys: Vec<Document>,
}

impl PipelineContext {
    pub fn new(options: &LoaderOptions) -> Result<Self, CouchError> {
        let endpoints = CouchEndpoints::from_base(&options.couch_db_url, &options.bulk_docs_path)?;
        Ok(Self {
            endpoints,
            build_data_dir: options.build_data_dir.clone(),
            demo_user_dir: options.demo_user_dir.clone(),
            just_delete: options.just_delete,
            snapset_prefs_safes: Vec::new(),
            gpii_keys: Vec::new(),
        })
    }

    /// Tombstoned snapsets followed by their tombstoned keys.
    pub fn deletion_batch(&self) -> Vec<Document> {
        self.snapset_prefs_safes
            .iter()
            .chain(&self.gpii_keys)
            .cloned()
            .collect()
    }
}

enum StepOutcome {
    Snapshots(usize),
    Keys(usize),
    Deleted(DeletionSummary, usize),
    Uploaded(UploadSummary, usize),
}

pub struct Pipeline<T = HttpTransport> {
    gateway: Gateway<T>,
}

impl<T: Transport> Pipeline<T> {
    pub fn new(gateway: Gateway<T>) -> Self {
        Self { gateway }
    }

    /// Run the steps planned from `ctx.just_delete`.
    pub async fn run(&self, ctx: &mut PipelineContext) -> Result<PipelineReport, PipelineError> {
        let mut report = PipelineReport::default();

        for step in Step::plan(ctx.just_delete) {
            log::debug!("Starting step '{step}'");
            let outcome = self
                .run_step(step, ctx)
                .await
                .map_err(|source| PipelineError { step, source })?;

            match outcome {
                StepOutcome::Snapshots(found) => report.snapsets_found = found,
                StepOutcome::Keys(found) => report.gpii_keys_found = found,
                StepOutcome::Deleted(summary, rejected) => {
                    report.deleted = Some(summary);
                    report.rejected += rejected;
                }
                StepOutcome::Uploaded(summary, rejected) => {
                    report.uploaded = Some(summary);
                    report.rejected += rejected;
                }
            }
        }

        Ok(report)
    }

    async fn run_step(
        &self,
        step: Step,
        ctx: &mut PipelineContext,
    ) -> Result<StepOutcome, StepError> {
        match step {
            Step::FetchSnapshots => self.fetch_snapshots(ctx).await,
            Step::FetchKeys => self.fetch_keys(ctx).await,
            Step::BatchDelete => self.batch_delete(ctx).await,
            Step::BatchUpload => self.batch_upload(ctx).await,
        }
    }

    async fn fetch_snapshots(&self, ctx: &mut PipelineContext) -> Result<StepOutcome, StepError> {
        let url = ctx.endpoints.prefs_safes_view.clone();
        let found = self
            .gateway
            .query(&url, "retrieving snapset Prefs Safes", |body| {
                log::info!("Processing the snapset Prefs Safes records...");
                let view = ViewResponse::parse(&body)?;
                let marked = mark_snapshots_for_deletion(view);
                let found = marked.len();
                ctx.snapset_prefs_safes.extend(marked);
                log::info!("{found} snapset Prefs Safes marked for deletion");
                Ok(found)
            })
            .await?;
        Ok(StepOutcome::Snapshots(found))
    }

    async fn fetch_keys(&self, ctx: &mut PipelineContext) -> Result<StepOutcome, StepError> {
        let url = ctx.endpoints.gpii_keys_view.clone();
        let found = self
            .gateway
            .query(&url, "retrieving GPII Keys", |body| {
                log::info!("Processing the GPII Keys...");
                let view = ViewResponse::parse(&body)?;
                log::debug!("{} GPII Keys in the database", view.len());
                ctx.gpii_keys = mark_keys_for_deletion(view, &ctx.snapset_prefs_safes);
                log::info!(
                    "{} GPII Keys associated with snapset Prefs Safes marked for deletion",
                    ctx.gpii_keys.len()
                );
                Ok(ctx.gpii_keys.len())
            })
            .await?;
        Ok(StepOutcome::Keys(found))
    }

    async fn batch_delete(&self, ctx: &mut PipelineContext) -> Result<StepOutcome, StepError> {
        let docs = ctx.deletion_batch();
        debug_assert!(docs.iter().all(Document::is_deleted));

        let summary = DeletionSummary {
            snapsets: ctx.snapset_prefs_safes.len(),
            gpii_keys: ctx.gpii_keys.len(),
        };
        let rejected = self
            .gateway
            .bulk_write(&docs, "deleting snapset Prefs Safes and GPII Keys", |body| {
                log::info!("{summary}");
                Ok(report::bulk_failures("deleting snapsets", &body))
            })
            .await?;
        Ok(StepOutcome::Deleted(summary, rejected))
    }

    async fn batch_upload(&self, ctx: &mut PipelineContext) -> Result<StepOutcome, StepError> {
        let mut docs = load_directory(&ctx.build_data_dir)?;
        docs.extend(load_directory(&ctx.demo_user_dir)?);

        let summary = UploadSummary {
            build_data_dir: ctx.build_data_dir.clone(),
            demo_user_dir: ctx.demo_user_dir.clone(),
            documents: docs.len(),
        };
        let rejected = self
            .gateway
            .bulk_write(&docs, "uploading snapsets and demo users", |body| {
                summary.log();
                Ok(report::bulk_failures("uploading snapsets", &body))
            })
            .await?;
        Ok(StepOutcome::Uploaded(summary, rejected))
    }
}
