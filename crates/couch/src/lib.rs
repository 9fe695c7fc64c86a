//! # Snapset Couch
//!
//! Thin gateway over the CouchDB HTTP API used by the snapset loader.
//!
//! Two request shapes are supported: a view query (GET) and a `_bulk_docs`
//! write (POST). Both go through [`Gateway`], which classifies the response
//! and hands a successful body to a caller-supplied transform:
//!
//! ```no_run
//! use snapset_couch::{CouchEndpoints, Gateway, HttpTransport};
//! use snapset_records::ViewResponse;
//!
//! #[tokio::main]
//! async fn main() -> snapset_couch::Result<()> {
//!     let endpoints = CouchEndpoints::from_base("http://localhost:5984/gpii", "/gpii/_bulk_docs")?;
//!     let gateway = Gateway::new(HttpTransport::new(None)?, endpoints);
//!     let url = gateway.endpoints().prefs_safes_view.clone();
//!     let rows = gateway
//!         .query(&url, "retrieving snapset Prefs Safes", |body| {
//!             Ok(ViewResponse::parse(&body)?.len())
//!         })
//!         .await?;
//!     println!("{rows} snapsets");
//!     Ok(())
//! }
//! ```

mod endpoints;
mod error;
mod gateway;
mod transport;

pub use endpoints::{
    BasicAuth, CouchEndpoints, ALL_GPII_KEYS_VIEW, DEFAULT_BULK_DOCS_PATH,
    SNAPSET_PREFS_SAFES_VIEW,
};
pub use error::{CouchError, Result};
pub use gateway::Gateway;
pub use transport::{DbRequest, HttpTransport, RawResponse, Transport, TransportFailure};
pub use reqwest::Url;
