use clap::Parser;
use snapset_couch::DEFAULT_BULK_DOCS_PATH;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Parser, Debug, Clone)]
#[command(name = "delete-and-load-snapsets")]
#[command(
    about = "Replace the snapset Prefs Safes and their GPII Keys in the preferences database",
    long_about = None
)]
#[command(version)]
pub struct Cli {
    /// Database URL, e.g. http://localhost:5984/gpii
    #[arg(value_name = "COUCHDB_URL")]
    pub couch_db_url: String,

    /// Directory with the new snapset Prefs Safes and GPII Keys (*.json)
    #[arg(value_name = "BUILD_DATA_DIR")]
    pub build_data_dir: PathBuf,

    /// Directory with the demo user Prefs Safes and GPII Keys (*.json)
    #[arg(value_name = "BUILD_DEMOUSER_DIR")]
    pub demo_user_dir: PathBuf,

    /// Only delete the current snapsets, do not upload anything
    #[arg(long = "justDelete")]
    pub just_delete: bool,

    /// Path of the bulk documents endpoint on the database host
    #[arg(long, default_value = DEFAULT_BULK_DOCS_PATH)]
    pub bulk_docs_path: String,

    /// Per-request timeout in seconds (default: wait indefinitely)
    #[arg(long)]
    pub timeout_secs: Option<u64>,

    /// Print the run report as JSON on stdout
    #[arg(long)]
    pub json: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Quiet mode: log only warnings/errors
    #[arg(long, conflicts_with = "verbose")]
    pub quiet: bool,
}

/// Settings for one pipeline run, taken from the command line.
#[derive(Debug, Clone)]
pub struct LoaderOptions {
    pub couch_db_url: String,
    pub bulk_docs_path: String,
    pub build_data_dir: PathBuf,
    pub demo_user_dir: PathBuf,
    pub just_delete: bool,
    pub timeout: Option<Duration>,
}

impl From<&Cli> for LoaderOptions {
    fn from(cli: &Cli) -> Self {
        Self {
            couch_db_url: cli.couch_db_url.clone(),
            bulk_docs_path: cli.bulk_docs_path.clone(),
            build_data_dir: cli.build_data_dir.clone(),
            demo_user_dir: cli.demo_user_dir.clone(),
            just_delete: cli.just_delete,
            timeout: cli.timeout_secs.map(Duration::from_secs),
        }
    }
}
