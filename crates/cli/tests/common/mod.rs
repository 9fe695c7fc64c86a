use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

/// In-process stand-in for the CouchDB endpoints the loader talks to.
#[derive(Default)]
pub struct MockCouch {
    pub snapsets: Value,
    pub keys: Value,
    /// When set, the GPII Keys view answers 404 with this reason.
    pub keys_missing_reason: Option<String>,
    pub bulk_bodies: Mutex<Vec<Value>>,
    pub view_hits: Mutex<usize>,
}

impl MockCouch {
    pub fn new(snapsets: Value, keys: Value) -> Self {
        Self {
            snapsets,
            keys,
            ..Self::default()
        }
    }

    pub fn bulk_docs(&self) -> Vec<Value> {
        self.bulk_bodies
            .lock()
            .unwrap()
            .iter()
            .map(|body| body["docs"].clone())
            .collect()
    }
}

type Shared = Arc<MockCouch>;

async fn snapsets(State(mock): State<Shared>) -> Json<Value> {
    *mock.view_hits.lock().unwrap() += 1;
    Json(mock.snapsets.clone())
}

async fn keys(State(mock): State<Shared>) -> Response {
    *mock.view_hits.lock().unwrap() += 1;
    match &mock.keys_missing_reason {
        Some(reason) => (
            StatusCode::NOT_FOUND,
            Json(json!({"error": "not_found", "reason": reason})),
        )
            .into_response(),
        None => Json(mock.keys.clone()).into_response(),
    }
}

async fn bulk_docs(State(mock): State<Shared>, Json(body): Json<Value>) -> impl IntoResponse {
    let results: Vec<Value> = body["docs"]
        .as_array()
        .map(|docs| {
            docs.iter()
                .map(|doc| json!({"id": doc["_id"], "rev": "1-mock", "ok": true}))
                .collect()
        })
        .unwrap_or_default();
    mock.bulk_bodies.lock().unwrap().push(body);
    (StatusCode::CREATED, Json(Value::Array(results)))
}

/// Serve `mock` on an ephemeral port and return the database URL.
pub async fn serve(mock: Shared) -> String {
    let app = Router::new()
        .route(
            "/gpii/_design/views/_view/findSnapsetPrefsSafes",
            get(snapsets),
        )
        .route("/gpii/_design/views/_view/findAllGpiiKeys", get(keys))
        .route("/gpii/_bulk_docs", post(bulk_docs))
        .with_state(mock);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind mock couchdb");
    let addr: SocketAddr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("serve mock couchdb");
    });
    format!("http://{addr}/gpii")
}

pub fn sample_snapsets() -> Value {
    json!({"total_rows": 2, "offset": 0, "rows": [
        {"id": "ps1", "key": "ps1", "value": {"_id": "ps1", "_rev": "1-a", "prefsSafeType": "snapset"}},
        {"id": "ps2", "key": "ps2", "value": {"_id": "ps2", "_rev": "1-b", "prefsSafeType": "snapset"}}
    ]})
}

pub fn sample_keys() -> Value {
    json!({"total_rows": 3, "offset": 0, "rows": [
        {"id": "k1", "key": "k1", "value": {"_id": "k1", "_rev": "1-c", "prefsSafeId": "ps1"}},
        {"id": "k2", "key": "k2", "value": {"_id": "k2", "_rev": "1-d", "prefsSafeId": "carla"}},
        {"id": "k3", "key": "k3", "value": {"_id": "k3", "_rev": "1-e", "prefsSafeId": "ps2"}}
    ]})
}
