use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, RecordsError>;

#[derive(Error, Debug)]
pub enum RecordsError {
    #[error("Filesystem error at {}: {source}", path.display())]
    Filesystem {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid JSON in {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
