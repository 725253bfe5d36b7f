//! etcd v3 KV client.
//!
//! Implements `StoreClient` for the flat v3 API through etcd's gRPC JSON
//! gateway. Keys and values travel base64 encoded. A dump is a single
//! `POST /v3/kv/range` covering every key with the root as prefix.

mod range;

pub use range::prefix_range_end;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use etcd_store::{
    build_http_client, select_endpoint, ClientConfig, DumpStats, FlatEntry, ProtocolVersion,
    StoreClient, StoreError, V3_DIAL_TIMEOUT,
};
use range::{GatewayError, RangeRequest, RangeResponse};
use reqwest::{Client, Url};
use std::path::Path;

/// etcd v3 client handle bound to one endpoint.
pub struct Etcd3Client {
    http: Client,
    endpoint: Url,
}

impl Etcd3Client {
    /// Wrap an existing HTTP client and endpoint.
    pub fn new(http: Client, endpoint: Url) -> Self {
        Self { http, endpoint }
    }

    /// Build the transport and bind to the first reachable endpoint.
    pub async fn connect(config: &ClientConfig) -> Result<Self, StoreError> {
        let http = build_http_client(config, V3_DIAL_TIMEOUT)?;
        let (endpoint, _) = select_endpoint(&http, config, ProtocolVersion::V3).await?;
        Ok(Self { http, endpoint })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    fn range_url(&self) -> Result<Url, StoreError> {
        let mut url = self.endpoint.clone();
        url.path_segments_mut()
            .map_err(|_| {
                StoreError::Setup(format!("Endpoint {} cannot carry a path", self.endpoint))
            })?
            .pop_if_empty()
            .extend(["v3", "kv", "range"]);
        Ok(url)
    }

    /// Scan all keys with `prefix`, in key order.
    pub async fn scan_prefix(&self, prefix: &str) -> Result<Vec<FlatEntry>, StoreError> {
        let request = if prefix.is_empty() {
            // whole keyspace: [\0, \0)
            RangeRequest::new(&[0], Some([0u8].as_slice()))
        } else {
            let end = prefix_range_end(prefix.as_bytes());
            RangeRequest::new(prefix.as_bytes(), Some(end.as_slice()))
        };
        self.range(prefix, &request).await
    }

    /// Fetch exactly one key. Empty when the key does not exist.
    pub async fn point(&self, key: &str) -> Result<Vec<FlatEntry>, StoreError> {
        self.range(key, &RangeRequest::new(key.as_bytes(), None))
            .await
    }

    async fn range(&self, key: &str, request: &RangeRequest) -> Result<Vec<FlatEntry>, StoreError> {
        let url = self.range_url()?;
        tracing::debug!("POST {url} (key: {key}, prefix: {})", request.range_end.is_some());

        let request_error = |source| StoreError::Request {
            key: key.to_string(),
            source,
        };
        let response = self
            .http
            .post(url)
            .json(request)
            .send()
            .await
            .map_err(request_error)?;
        let status = response.status();
        let body = response.bytes().await.map_err(request_error)?;

        if !status.is_success() {
            let message = match serde_json::from_slice::<GatewayError>(&body) {
                Ok(error) => error.describe(),
                Err(_) => format!("HTTP {status}: {}", String::from_utf8_lossy(&body)),
            };
            return Err(StoreError::Response {
                key: key.to_string(),
                message,
            });
        }

        let response: RangeResponse = serde_json::from_slice(&body)
            .map_err(|e| StoreError::malformed(key, format!("undecodable body: {e}")))?;

        response
            .kvs
            .into_iter()
            .map(|kv| -> Result<FlatEntry, StoreError> {
                let entry_key = BASE64
                    .decode(&kv.key)
                    .map_err(|e| StoreError::malformed(key, format!("key is not base64: {e}")))?;
                let entry_key = String::from_utf8(entry_key).map_err(|e| {
                    StoreError::malformed(
                        String::from_utf8_lossy(e.as_bytes()),
                        "key is not valid UTF-8",
                    )
                })?;
                let value = BASE64.decode(&kv.value).map_err(|e| {
                    StoreError::malformed(&entry_key, format!("value is not base64: {e}"))
                })?;
                Ok(FlatEntry::new(entry_key, value))
            })
            .collect()
    }
}

#[async_trait::async_trait]
impl StoreClient for Etcd3Client {
    async fn dump(&self, root: &str, destination: &Path) -> Result<DumpStats, StoreError> {
        let entries = self.scan_prefix(root).await?;
        tracing::info!("Number of keys to dump: {}", entries.len());
        keyspace_dump::dump_entries(entries, destination).await
    }

    async fn get(&self, key: &str) -> Result<Vec<u8>, StoreError> {
        match self.point(key).await?.into_iter().next() {
            Some(entry) => Ok(entry.value),
            None => Err(StoreError::NotFound {
                key: key.to_string(),
            }),
        }
    }

    fn protocol(&self) -> ProtocolVersion {
        ProtocolVersion::V3
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Etcd3Client>();
    }

    #[test]
    fn test_range_url() {
        let client = Etcd3Client::new(Client::new(), Url::parse("https://etcd-0:2379").unwrap());
        assert_eq!(
            client.range_url().unwrap().as_str(),
            "https://etcd-0:2379/v3/kv/range"
        );
    }
}
