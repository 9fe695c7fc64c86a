use thiserror::Error;

pub type Result<T> = std::result::Result<T, CouchError>;

#[derive(Error, Debug)]
pub enum CouchError {
    /// The database answered with a status >= 400.
    #[error("Error {action}: {status} - {status_text}{}", reason_suffix(.reason))]
    RequestFailed {
        action: String,
        status: u16,
        status_text: String,
        /// CouchDB's `reason` field, only read for 404 responses.
        reason: Option<String>,
    },

    /// No response was obtained, or the response stream broke.
    #[error("Error {action}: {message}")]
    Transport { action: String, message: String },

    #[error("Invalid database URL '{url}': {message}")]
    InvalidUrl { url: String, message: String },

    #[error("Failed to build HTTP client: {0}")]
    Client(String),

    #[error(transparent)]
    Records(#[from] snapset_records::RecordsError),
}

fn reason_suffix(reason: &Option<String>) -> String {
    reason
        .as_deref()
        .map(|reason| format!(", {reason}"))
        .unwrap_or_default()
}
