use crate::document::Document;
use crate::error::Result;
use serde::Deserialize;

/// Result of a CouchDB view query: `{ "rows": [ { "value": {...} }, ... ] }`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ViewResponse {
    #[serde(default)]
    pub rows: Vec<ViewRow>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ViewRow {
    pub value: Document,
}

impl ViewResponse {
    pub fn parse(body: &str) -> Result<Self> {
        Ok(serde_json::from_str(body)?)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
