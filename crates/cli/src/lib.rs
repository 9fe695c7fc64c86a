//! # Snapset Loader
//!
//! Replaces the generated "snapset" Prefs Safes in the preferences database:
//!
//! 1. fetch every Prefs Safe of type `snapset` and tombstone it,
//! 2. fetch all GPII Keys and tombstone those pointing at a snapset,
//! 3. delete both sets with one `_bulk_docs` request,
//! 4. unless `--justDelete` is given, upload the build data and demo user
//!    records from disk with a second `_bulk_docs` request.

use anyhow::{Context as AnyhowContext, Result};
use clap::error::ErrorKind;
use clap::Parser;
use snapset_couch::{Gateway, HttpTransport};
use std::process::ExitCode;

pub mod options;
pub mod pipeline;
pub mod report;

pub use options::{Cli, LoaderOptions};
pub use pipeline::{Pipeline, PipelineContext, PipelineError, Step, StepError};
pub use report::{DeletionSummary, PipelineReport, UploadSummary};

pub async fn main_entry() -> ExitCode {
    let mut cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => return usage_exit(err),
    };
    // keep stderr down to warnings when stdout carries the JSON report
    if cli.json {
        cli.quiet = true;
    }
    init_logging(cli.verbose, cli.quiet);

    match run(&cli).await {
        Ok(report) => {
            if cli.json {
                match serde_json::to_string_pretty(&report) {
                    Ok(json) => println!("{json}"),
                    Err(err) => {
                        log::error!("Failed to serialize report: {err}");
                        return ExitCode::FAILURE;
                    }
                }
            }
            log::info!("Done.");
            ExitCode::SUCCESS
        }
        Err(err) => {
            log::error!("{err:#}");
            ExitCode::FAILURE
        }
    }
}

pub async fn run(cli: &Cli) -> Result<PipelineReport> {
    let options = LoaderOptions::from(cli);
    let mut ctx = PipelineContext::new(&options).context("Invalid COUCHDB_URL")?;

    log::info!("COUCHDB_URL: '{}'", ctx.endpoints.redacted());
    log::info!("BUILD_DATA_DIR: '{}'", options.build_data_dir.display());
    log::info!("BUILD_DEMOUSER_DIR: '{}'", options.demo_user_dir.display());
    if options.just_delete {
        log::info!("--justDelete: existing snapsets will be removed, nothing uploaded");
    }

    let transport = HttpTransport::new(options.timeout)?;
    let gateway = Gateway::new(transport, ctx.endpoints.clone());
    let pipeline = Pipeline::new(gateway);

    Ok(pipeline.run(&mut ctx).await?)
}

/// Help and version go to stdout with exit 0; any other argument problem is
/// logged with the usage text and exits 1.
fn usage_exit(err: clap::Error) -> ExitCode {
    if matches!(err.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) {
        print!("{}", err.render());
        return ExitCode::SUCCESS;
    }
    init_logging(false, false);
    log::error!("{}", err.render().to_string().trim_end());
    ExitCode::FAILURE
}

fn init_logging(verbose: bool, quiet: bool) {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    if quiet {
        builder.filter_level(log::LevelFilter::Warn);
    } else if verbose {
        builder.filter_level(log::LevelFilter::Debug);
    }
    // HTTP client internals are noisy; keep them out unless verbose
    if !verbose {
        builder.filter_module("hyper", log::LevelFilter::Warn);
        builder.filter_module("reqwest", log::LevelFilter::Warn);
    }
    builder.target(env_logger::Target::Stderr).init();
}
