//! Local HTTP server speaking enough of etcd's v2 keys API and v3 JSON
//! gateway for end-to-end tests.

#![allow(dead_code)]

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use serde_json::{json, Value};
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::net::TcpListener;

#[derive(Default)]
pub struct MockEtcd {
    keyspace: BTreeMap<String, String>,
    pub version_probes: AtomicU64,
    pub reads: AtomicU64,
}

impl MockEtcd {
    pub fn probes(&self) -> u64 {
        self.version_probes.load(Ordering::SeqCst)
    }

    pub fn reads(&self) -> u64 {
        self.reads.load(Ordering::SeqCst)
    }
}

/// Start a mock cluster member holding `entries`; returns its URL.
pub async fn start_mock_etcd(entries: &[(&str, &str)]) -> (String, Arc<MockEtcd>) {
    let state = Arc::new(MockEtcd {
        keyspace: entries
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect(),
        ..MockEtcd::default()
    });

    let app = Router::new()
        .route("/version", get(version))
        .route("/v2/keys/", get(v2_root))
        .route("/v2/keys/*key", get(v2_keys))
        .route("/v3/kv/range", post(v3_range))
        .with_state(Arc::clone(&state));

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (format!("http://{addr}"), state)
}

/// URL of a port nothing listens on.
pub async fn dead_endpoint() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}")
}

async fn version(State(state): State<Arc<MockEtcd>>) -> Json<Value> {
    state.version_probes.fetch_add(1, Ordering::SeqCst);
    Json(json!({ "etcdserver": "3.5.9", "etcdcluster": "3.5.0" }))
}

fn v2_node(key: &str, keyspace: &BTreeMap<String, String>, recursive: bool) -> Option<Value> {
    if let Some(value) = keyspace.get(key) {
        return Some(json!({ "key": key, "value": value }));
    }

    let dir_prefix = if key == "/" {
        "/".to_string()
    } else {
        format!("{key}/")
    };
    let children: BTreeSet<String> = keyspace
        .keys()
        .filter_map(|k| k.strip_prefix(&dir_prefix))
        .filter_map(|rest| rest.split('/').next())
        .map(|segment| format!("{dir_prefix}{segment}"))
        .collect();

    if children.is_empty() && key != "/" {
        return None;
    }

    let mut node = json!({ "key": key, "dir": true });
    if recursive {
        let nodes: Vec<Value> = children
            .iter()
            .filter_map(|child| v2_node(child, keyspace, true))
            .collect();
        node["nodes"] = json!(nodes);
    }
    Some(node)
}

fn v2_response(state: &MockEtcd, key: &str, params: &HashMap<String, String>) -> Response {
    state.reads.fetch_add(1, Ordering::SeqCst);
    let recursive = params.get("recursive").map(String::as_str) == Some("true");

    match v2_node(key, &state.keyspace, recursive) {
        Some(node) => Json(json!({ "action": "get", "node": node })).into_response(),
        None => (
            StatusCode::NOT_FOUND,
            Json(json!({ "errorCode": 100, "message": "Key not found", "cause": key, "index": 1 })),
        )
            .into_response(),
    }
}

async fn v2_root(
    State(state): State<Arc<MockEtcd>>,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    v2_response(&state, "/", &params)
}

async fn v2_keys(
    State(state): State<Arc<MockEtcd>>,
    Path(key): Path<String>,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    let key = format!("/{}", key.trim_start_matches('/'));
    v2_response(&state, &key, &params)
}

async fn v3_range(State(state): State<Arc<MockEtcd>>, Json(body): Json<Value>) -> Response {
    state.reads.fetch_add(1, Ordering::SeqCst);

    let decode = |field: &str| {
        body.get(field)
            .and_then(Value::as_str)
            .map(|s| BASE64.decode(s).unwrap())
    };
    let key = decode("key").unwrap_or_default();
    let range_end = decode("range_end");

    let kvs: Vec<Value> = state
        .keyspace
        .iter()
        .filter(|(k, _)| {
            let k = k.as_bytes();
            match &range_end {
                None => k == key.as_slice(),
                Some(end) if end.as_slice() == [0] => k >= key.as_slice(),
                Some(end) => k >= key.as_slice() && k < end.as_slice(),
            }
        })
        .map(|(k, v)| json!({ "key": BASE64.encode(k), "value": BASE64.encode(v) }))
        .collect();

    let mut response = json!({ "header": { "revision": "5" } });
    if !kvs.is_empty() {
        response["kvs"] = json!(kvs);
    }
    Json(response).into_response()
}
