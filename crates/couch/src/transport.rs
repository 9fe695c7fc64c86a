use crate::endpoints::BasicAuth;
use crate::error::{CouchError, Result};
use async_trait::async_trait;
use hyper::ext::ReasonPhrase;
use reqwest::header::{ACCEPT, CONTENT_LENGTH, CONTENT_TYPE};
use reqwest::{Client, Method, Url};
use snapset_records::BulkDocsBody;
use std::time::Duration;

const APPLICATION_JSON: &str = "application/json";

/// A single database round-trip.
#[derive(Debug, Clone)]
pub enum DbRequest {
    View {
        url: Url,
        auth: Option<BasicAuth>,
    },
    BulkDocs {
        url: Url,
        auth: Option<BasicAuth>,
        body: BulkDocsBody,
    },
}

impl DbRequest {
    pub fn method(&self) -> Method {
        match self {
            Self::View { .. } => Method::GET,
            Self::BulkDocs { .. } => Method::POST,
        }
    }

    pub fn url(&self) -> &Url {
        match self {
            Self::View { url, .. } | Self::BulkDocs { url, .. } => url,
        }
    }
}

/// Status line and fully assembled body of a response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub status_text: String,
    pub body: String,
}

/// Connection-level failure: nothing usable came back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportFailure {
    pub message: String,
}

#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: DbRequest) -> std::result::Result<RawResponse, TransportFailure>;
}

/// reqwest-backed transport. No timeout unless one is configured.
#[derive(Clone)]
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    pub fn new(timeout: Option<Duration>) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|err| CouchError::Client(error_chain(&err)))?;
        Ok(Self { client })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, request: DbRequest) -> std::result::Result<RawResponse, TransportFailure> {
        let mut builder = self
            .client
            .request(request.method(), request.url().clone())
            .header(ACCEPT, APPLICATION_JSON);

        let auth = match &request {
            DbRequest::View { auth, .. } | DbRequest::BulkDocs { auth, .. } => auth.as_ref(),
        };
        if let Some(auth) = auth {
            builder = builder.basic_auth(&auth.username, auth.password.as_ref());
        }
        if let DbRequest::BulkDocs { body, .. } = &request {
            builder = builder
                .header(CONTENT_TYPE, APPLICATION_JSON)
                .header(CONTENT_LENGTH, body.content_length)
                .body(body.json.clone());
        }

        let response = builder.send().await.map_err(transport_failure)?;
        let status = response.status();
        let status_text = reason_phrase(&response);
        let body = response.text().await.map_err(transport_failure)?;

        Ok(RawResponse {
            status: status.as_u16(),
            status_text,
            body,
        })
    }
}

/// The server's own reason phrase (CouchDB says "Object Not Found"), else the
/// canonical one. hyper only records the phrase when it is non-canonical.
fn reason_phrase(response: &reqwest::Response) -> String {
    match response.extensions().get::<ReasonPhrase>() {
        Some(reason) => String::from_utf8_lossy(reason.as_bytes()).into_owned(),
        None => response
            .status()
            .canonical_reason()
            .unwrap_or_default()
            .to_string(),
    }
}

fn transport_failure(err: reqwest::Error) -> TransportFailure {
    TransportFailure {
        message: error_chain(&err),
    }
}

fn error_chain(err: &dyn std::error::Error) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}
