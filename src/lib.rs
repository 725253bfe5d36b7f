//! etcd-dump library
//!
//! Snapshots an etcd keyspace into a directory tree (one file per key) and
//! generates bursty read load against a single key.
//!
//! # Features
//!
//! - Dual protocol: the same dump/get operations over the v2 keys API or the
//!   v3 KV API, selected at connection time
//! - JSON-aware dumps: values that parse as JSON are written tab-indented
//! - Load generation: reconnecting bursts of concurrent, jittered reads
//!
//! # Backend Crates
//!
//! - `etcd_store` - `StoreClient` trait, configuration, transport, errors
//! - `etcd2_client` - v2 tree backend
//! - `etcd3_client` - v3 flat backend
//! - `keyspace_dump` - filesystem mirror and value policy
//! - `get_overload` - load generator
//!
//! # CLI Usage
//!
//! ```bash
//! # Dump everything below /config using the v3 API
//! etcd-dump dump --enable-v3 --endpoints https://etcd-0:2379 \
//!   --cert-path client.crt --key-path client.key --ca-path ca.crt \
//!   --root /config --destination ./snapshot
//!
//! # 1000 gets in bursts of 100, each delayed 1-5 seconds
//! etcd-dump get-overload --endpoints http://127.0.0.1:2379 \
//!   --etcd-key /config/a --numgets 1000 --refresh-interval 100 --max-wait 5
//! ```

use clap::Args;
use etcd_store::{ClientConfig, ProtocolVersion, StoreError, TlsPaths};
use std::path::{Path, PathBuf};

pub mod connect;

pub use connect::{connect_store, EtcdConnector};

#[derive(Args, Clone, Debug)]
pub struct ClientOpts {
    /// Path to the etcd client certificate
    #[arg(long, env = "ETCD_CERT_PATH", requires_all = ["key_path", "ca_path"])]
    pub cert_path: Option<PathBuf>,

    /// Path to the etcd client key
    #[arg(long, env = "ETCD_KEY_PATH", requires_all = ["cert_path", "ca_path"])]
    pub key_path: Option<PathBuf>,

    /// Path to the etcd CA certificate
    #[arg(long, env = "ETCD_CA_PATH", requires_all = ["cert_path", "key_path"])]
    pub ca_path: Option<PathBuf>,

    /// Endpoints on which etcd is listening (repeatable or comma-separated)
    #[arg(
        long,
        env = "ETCD_ENDPOINTS",
        value_delimiter = ',',
        default_value = "http://127.0.0.1:2379"
    )]
    pub endpoints: Vec<String>,

    /// etcd API to use
    #[arg(long, default_value = "v2", env = "ETCD_PROTOCOL")]
    pub protocol: ProtocolVersion,

    /// Enable the v3 client (same as --protocol v3)
    #[arg(long, conflicts_with = "protocol")]
    pub enable_v3: bool,
}

impl ClientOpts {
    /// The protocol selected by `--protocol` / `--enable-v3`.
    pub fn protocol(&self) -> ProtocolVersion {
        if self.enable_v3 {
            ProtocolVersion::V3
        } else {
            self.protocol
        }
    }

    /// Build the client configuration, resolving TLS paths against the
    /// current directory.
    pub fn to_config(&self) -> Result<ClientConfig, StoreError> {
        let tls = match (&self.cert_path, &self.key_path, &self.ca_path) {
            (Some(cert), Some(key), Some(ca)) => Some(TlsPaths {
                cert_path: absolute(cert)?,
                key_path: absolute(key)?,
                ca_path: absolute(ca)?,
            }),
            (None, None, None) => None,
            _ => {
                return Err(StoreError::Setup(
                    "--cert-path, --key-path and --ca-path must be given together".to_string(),
                ))
            }
        };

        ClientConfig::new(self.endpoints.as_slice(), tls)
    }
}

fn absolute(path: &Path) -> Result<PathBuf, StoreError> {
    std::path::absolute(path).map_err(|e| {
        StoreError::Setup(format!("Cannot resolve path {}: {e}", path.display()))
    })
}
