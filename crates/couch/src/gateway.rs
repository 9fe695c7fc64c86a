use crate::endpoints::CouchEndpoints;
use crate::error::{CouchError, Result};
use crate::transport::{DbRequest, HttpTransport, RawResponse, Transport};
use reqwest::Url;
use serde::Deserialize;
use snapset_records::{encode_bulk_docs, Document};

const NOT_FOUND: u16 = 404;

#[derive(Deserialize)]
struct ErrorBody {
    reason: Option<String>,
}

/// Issues view queries and bulk writes, and classifies their outcome.
///
/// `on_success` receives the response body only when the status is below
/// 400; every other outcome is returned as a [`CouchError`] without calling it.
pub struct Gateway<T = HttpTransport> {
    transport: T,
    endpoints: CouchEndpoints,
}

impl<T: Transport> Gateway<T> {
    pub fn new(transport: T, endpoints: CouchEndpoints) -> Self {
        Self {
            transport,
            endpoints,
        }
    }

    pub fn endpoints(&self) -> &CouchEndpoints {
        &self.endpoints
    }

    pub async fn query<R>(
        &self,
        url: &Url,
        action: &str,
        on_success: impl FnOnce(String) -> Result<R>,
    ) -> Result<R> {
        log::debug!("GET {url}");
        let request = DbRequest::View {
            url: url.clone(),
            auth: self.endpoints.auth.clone(),
        };
        self.round_trip(request, action, on_success).await
    }

    /// POST `{"docs": docs}` to the bulk-docs endpoint.
    pub async fn bulk_write<R>(
        &self,
        docs: &[Document],
        action: &str,
        on_success: impl FnOnce(String) -> Result<R>,
    ) -> Result<R> {
        let body = encode_bulk_docs(docs)?;
        log::debug!(
            "POST {} ({} docs, {} bytes)",
            self.endpoints.bulk_docs,
            docs.len(),
            body.content_length
        );
        let request = DbRequest::BulkDocs {
            url: self.endpoints.bulk_docs.clone(),
            auth: self.endpoints.auth.clone(),
            body,
        };
        self.round_trip(request, action, on_success).await
    }

    async fn round_trip<R>(
        &self,
        request: DbRequest,
        action: &str,
        on_success: impl FnOnce(String) -> Result<R>,
    ) -> Result<R> {
        let response = self
            .transport
            .send(request)
            .await
            .map_err(|failure| CouchError::Transport {
                action: action.to_string(),
                message: failure.message,
            })?;
        settle(response, action, on_success)
    }
}

fn settle<R>(
    response: RawResponse,
    action: &str,
    on_success: impl FnOnce(String) -> Result<R>,
) -> Result<R> {
    if response.status < 400 {
        return on_success(response.body);
    }

    let reason = if response.status == NOT_FOUND {
        serde_json::from_str::<ErrorBody>(&response.body)
            .ok()
            .and_then(|body| body.reason)
    } else {
        None
    };
    Err(CouchError::RequestFailed {
        action: action.to_string(),
        status: response.status,
        status_text: response.status_text,
        reason,
    })
}
