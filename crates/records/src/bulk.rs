use crate::document::Document;
use crate::error::Result;
use serde::{Deserialize, Serialize};

#[derive(Serialize)]
struct BulkDocsRequest<'a> {
    docs: &'a [Document],
}

/// Encoded `_bulk_docs` request body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BulkDocsBody {
    pub json: String,
    /// Byte length of `json`, sent as `Content-Length`.
    pub content_length: usize,
}

pub fn encode_bulk_docs(docs: &[Document]) -> Result<BulkDocsBody> {
    let json = serde_json::to_string(&BulkDocsRequest { docs })?;
    let content_length = json.len();
    Ok(BulkDocsBody {
        json,
        content_length,
    })
}

/// One entry of the `_bulk_docs` response array.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct BulkDocResult {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub rev: Option<String>,
    #[serde(default)]
    pub ok: Option<bool>,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub reason: Option<String>,
}

impl BulkDocResult {
    pub fn parse_all(body: &str) -> Result<Vec<Self>> {
        Ok(serde_json::from_str(body)?)
    }

    pub fn is_failure(&self) -> bool {
        self.error.is_some()
    }

    /// Failed entries of a bulk response, in response order.
    pub fn failures(results: &[Self]) -> Vec<&Self> {
        results.iter().filter(|r| r.is_failure()).collect()
    }
}
