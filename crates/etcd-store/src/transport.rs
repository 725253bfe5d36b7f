//! HTTP transport shared by both backends.
//!
//! Builds the TLS-authenticated `reqwest` client and picks the endpoint a
//! handle talks to by probing each configured endpoint's `/version`.

use crate::{ClientConfig, ProtocolVersion, StoreError, TlsPaths};
use reqwest::{Certificate, Client, Identity, Url};
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

/// Dial timeout of the v2 transport.
pub const V2_DIAL_TIMEOUT: Duration = Duration::from_secs(30);

/// Dial timeout of the v3 transport.
pub const V3_DIAL_TIMEOUT: Duration = Duration::from_secs(5);

pub const KEEPALIVE_INTERVAL: Duration = Duration::from_secs(30);

pub const MAX_IDLE_PER_HOST: usize = 64;

/// Upper bound on the whole `/version` round trip during endpoint selection.
pub const PROBE_TIMEOUT: Duration = Duration::from_secs(10);

/// Body of etcd's `/version` endpoint, e.g.
/// `{"etcdserver":"3.5.9","etcdcluster":"3.5.0"}`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ServerVersion {
    #[serde(rename = "etcdserver")]
    pub server: String,
    #[serde(rename = "etcdcluster", default)]
    pub cluster: String,
}

impl ServerVersion {
    /// Major component of the server version, if it parses.
    pub fn major(&self) -> Option<u64> {
        self.server.trim().split('.').next()?.parse().ok()
    }
}

/// Build the HTTP client for one store handle.
pub fn build_http_client(
    config: &ClientConfig,
    connect_timeout: Duration,
) -> Result<Client, StoreError> {
    let mut builder = Client::builder()
        .connect_timeout(connect_timeout)
        .tcp_keepalive(KEEPALIVE_INTERVAL)
        .pool_max_idle_per_host(MAX_IDLE_PER_HOST);

    if let Some(tls) = config.tls() {
        let (identity, ca) = load_tls(tls)?;
        builder = builder
            .use_rustls_tls()
            .tls_built_in_root_certs(false)
            .add_root_certificate(ca)
            .identity(identity);
    }

    builder
        .build()
        .map_err(|e| StoreError::Setup(format!("Failed to build HTTP client: {e}")))
}

fn load_tls(tls: &TlsPaths) -> Result<(Identity, Certificate), StoreError> {
    let mut pem = read_pem(&tls.cert_path)?;
    pem.push(b'\n');
    pem.extend(read_pem(&tls.key_path)?);

    let identity = Identity::from_pem(&pem).map_err(|e| {
        StoreError::Setup(format!(
            "Invalid client certificate/key pair ({}, {}): {e}",
            tls.cert_path.display(),
            tls.key_path.display()
        ))
    })?;

    let ca = Certificate::from_pem(&read_pem(&tls.ca_path)?).map_err(|e| {
        StoreError::Setup(format!(
            "Invalid CA certificate {}: {e}",
            tls.ca_path.display()
        ))
    })?;

    Ok((identity, ca))
}

fn read_pem(path: &Path) -> Result<Vec<u8>, StoreError> {
    std::fs::read(path).map_err(|source| StoreError::TlsMaterial {
        path: path.to_path_buf(),
        source,
    })
}

/// Probe the configured endpoints in order and return the first one that
/// answers `/version`, together with the version it reported.
///
/// An endpoint that answers with a server too old for `protocol` fails the
/// selection outright since the rest of the cluster runs the same release.
pub async fn select_endpoint(
    client: &Client,
    config: &ClientConfig,
    protocol: ProtocolVersion,
) -> Result<(Url, ServerVersion), StoreError> {
    for endpoint in config.endpoints() {
        let version_url = match endpoint.join("version") {
            Ok(url) => url,
            Err(e) => {
                tracing::warn!("Skipping endpoint {endpoint}: {e}");
                continue;
            }
        };

        tracing::debug!("Probing etcd endpoint {version_url}");

        let response = match client.get(version_url.clone()).timeout(PROBE_TIMEOUT).send().await {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!("Endpoint {endpoint} is unreachable: {e}");
                continue;
            }
        };

        if !response.status().is_success() {
            tracing::warn!(
                "Endpoint {endpoint} answered {} on {version_url}",
                response.status()
            );
            continue;
        }

        let version: ServerVersion = match response.json().await {
            Ok(version) => version,
            Err(e) => {
                tracing::warn!("Endpoint {endpoint} returned an unreadable version: {e}");
                continue;
            }
        };

        if let Some(major) = version.major() {
            if !protocol.supported_by(major) {
                return Err(StoreError::Setup(format!(
                    "etcd server {} at {endpoint} does not serve the {protocol} API",
                    version.server
                )));
            }
        }

        tracing::info!(
            "Using etcd endpoint {endpoint} (server {}, cluster {}, protocol {protocol})",
            version.server,
            version.cluster
        );

        return Ok((endpoint.clone(), version));
    }

    let tried = config
        .endpoints()
        .iter()
        .map(Url::as_str)
        .collect::<Vec<_>>()
        .join(", ");
    Err(StoreError::Setup(format!(
        "No reachable etcd endpoint among [{tried}]"
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use tempfile::TempDir;

    #[test]
    fn test_server_version_major() {
        let version: ServerVersion =
            serde_json::from_str(r#"{"etcdserver":"3.5.9","etcdcluster":"3.5.0"}"#).unwrap();
        assert_eq!(version.major(), Some(3));
        assert_eq!(version.cluster, "3.5.0");

        let version: ServerVersion = serde_json::from_str(r#"{"etcdserver":"2.3.8"}"#).unwrap();
        assert_eq!(version.major(), Some(2));
        assert_eq!(version.cluster, "");
    }

    #[test]
    fn test_server_version_unparseable_major() {
        let version = ServerVersion {
            server: "not-a-version".to_string(),
            cluster: String::new(),
        };
        assert_eq!(version.major(), None);
    }

    #[test]
    fn test_plain_client_builds() {
        let config = ClientConfig::new(&["127.0.0.1:2379"], None).unwrap();
        assert!(build_http_client(&config, V3_DIAL_TIMEOUT).is_ok());
    }

    #[test]
    fn test_missing_tls_material() {
        let temp_dir = TempDir::new().unwrap();
        let missing = temp_dir.path().join("missing.crt");
        let config = ClientConfig::new(
            &["etcd-0:2379"],
            Some(TlsPaths {
                cert_path: missing.clone(),
                key_path: temp_dir.path().join("client.key"),
                ca_path: temp_dir.path().join("ca.crt"),
            }),
        )
        .unwrap();

        match build_http_client(&config, V2_DIAL_TIMEOUT) {
            Err(StoreError::TlsMaterial { path, .. }) => assert_eq!(path, missing),
            other => panic!("expected TlsMaterial error, got {other:?}"),
        }
    }

    #[test]
    fn test_invalid_tls_material() {
        let temp_dir = TempDir::new().unwrap();
        let write = |name: &str| -> PathBuf {
            let path = temp_dir.path().join(name);
            std::fs::write(&path, "not a pem file").unwrap();
            path
        };
        let config = ClientConfig::new(
            &["etcd-0:2379"],
            Some(TlsPaths {
                cert_path: write("client.crt"),
                key_path: write("client.key"),
                ca_path: write("ca.crt"),
            }),
        )
        .unwrap();

        let err = build_http_client(&config, V2_DIAL_TIMEOUT).unwrap_err();
        assert!(matches!(err, StoreError::Setup(_)), "got {err:?}");
    }
}
