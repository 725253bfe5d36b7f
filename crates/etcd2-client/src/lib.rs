//! etcd v2 keys API client.
//!
//! Implements `StoreClient` for the hierarchical v2 API: a dump is a single
//! recursive `GET /v2/keys/<root>?recursive=true` whose node tree is handed
//! to the dump engine.

use etcd_store::{
    build_http_client, select_endpoint, ClientConfig, DumpStats, KeyNode, ProtocolVersion,
    StoreClient, StoreError, V2_DIAL_TIMEOUT,
};
use reqwest::{Client, Url};
use serde::Deserialize;
use std::path::Path;

/// v2 error code for a missing key.
const KEY_NOT_FOUND: u64 = 100;

#[derive(Debug, Deserialize)]
struct GetResponse {
    node: Option<KeyNode>,
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    #[serde(rename = "errorCode")]
    error_code: u64,
    #[serde(default)]
    message: String,
    #[serde(default)]
    cause: String,
}

/// etcd v2 client handle bound to one endpoint.
pub struct Etcd2Client {
    http: Client,
    endpoint: Url,
}

impl Etcd2Client {
    /// Wrap an existing HTTP client and endpoint.
    pub fn new(http: Client, endpoint: Url) -> Self {
        Self { http, endpoint }
    }

    /// Build the transport and bind to the first reachable endpoint.
    pub async fn connect(config: &ClientConfig) -> Result<Self, StoreError> {
        let http = build_http_client(config, V2_DIAL_TIMEOUT)?;
        let (endpoint, _) = select_endpoint(&http, config, ProtocolVersion::V2).await?;
        Ok(Self { http, endpoint })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    fn keys_url(&self, key: &str) -> Result<Url, StoreError> {
        if key.split('/').any(|segment| segment == "..") {
            return Err(StoreError::malformed(key, "key contains a '..' segment"));
        }

        let mut url = self.endpoint.clone();
        {
            let mut segments = url.path_segments_mut().map_err(|_| {
                StoreError::Setup(format!("Endpoint {} cannot carry a path", self.endpoint))
            })?;
            segments.pop_if_empty().extend(["v2", "keys"]);

            let mut key_segments = key
                .split('/')
                .filter(|s| !s.is_empty() && *s != ".")
                .peekable();
            if key_segments.peek().is_none() {
                segments.push("");
            }
            segments.extend(key_segments);
        }
        Ok(url)
    }

    /// Fetch the node for `key`. Returns `None` when the key does not exist.
    pub async fn fetch(&self, key: &str, recursive: bool) -> Result<Option<KeyNode>, StoreError> {
        let url = self.keys_url(key)?;
        tracing::debug!("GET {url} (recursive: {recursive})");

        let mut request = self.http.get(url);
        if recursive {
            request = request.query(&[("recursive", "true")]);
        }

        let request_error = |source| StoreError::Request {
            key: key.to_string(),
            source,
        };
        let response = request.send().await.map_err(request_error)?;
        let status = response.status();
        let body = response.bytes().await.map_err(request_error)?;

        if !status.is_success() {
            return match serde_json::from_slice::<ErrorResponse>(&body) {
                Ok(error) if error.error_code == KEY_NOT_FOUND => Ok(None),
                Ok(error) => Err(StoreError::Response {
                    key: key.to_string(),
                    message: format!(
                        "{} (code {}, cause {})",
                        error.message, error.error_code, error.cause
                    ),
                }),
                Err(_) => Err(StoreError::Response {
                    key: key.to_string(),
                    message: format!("HTTP {status}: {}", String::from_utf8_lossy(&body)),
                }),
            };
        }

        let response: GetResponse = serde_json::from_slice(&body)
            .map_err(|e| StoreError::malformed(key, format!("undecodable body: {e}")))?;

        match response.node {
            Some(node) => Ok(Some(node)),
            None => Err(StoreError::malformed(key, "response carries no node")),
        }
    }
}

#[async_trait::async_trait]
impl StoreClient for Etcd2Client {
    async fn dump(&self, root: &str, destination: &Path) -> Result<DumpStats, StoreError> {
        match self.fetch(root, true).await? {
            Some(node) => keyspace_dump::dump_tree(&node, destination).await,
            None => Err(StoreError::NotFound {
                key: root.to_string(),
            }),
        }
    }

    async fn get(&self, key: &str) -> Result<Vec<u8>, StoreError> {
        match self.fetch(key, false).await? {
            Some(node) => Ok(node.value),
            None => Err(StoreError::NotFound {
                key: key.to_string(),
            }),
        }
    }

    fn protocol(&self) -> ProtocolVersion {
        ProtocolVersion::V2
    }
}
