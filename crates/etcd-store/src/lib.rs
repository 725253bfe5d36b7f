//! Store client abstraction for etcd.
//!
//! Provides the `StoreClient` trait implemented by the v2 (tree) and v3
//! (flat) backends, together with the pieces both of them share: client
//! configuration, the TLS-aware HTTP transport, the data model and the
//! error type.

mod config;
mod error;
mod model;
mod traits;
mod transport;
mod version;

pub use config::{ClientConfig, TlsPaths};
pub use error::{ErrorKind, StoreError};
pub use model::{DumpStats, FlatEntry, KeyNode};
pub use traits::{StoreClient, StoreClientFactory};
pub use transport::{
    build_http_client, select_endpoint, ServerVersion, KEEPALIVE_INTERVAL, MAX_IDLE_PER_HOST,
    PROBE_TIMEOUT, V2_DIAL_TIMEOUT, V3_DIAL_TIMEOUT,
};
pub use version::ProtocolVersion;
