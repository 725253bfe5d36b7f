//! Trait definitions for etcd store clients.

use crate::{DumpStats, ProtocolVersion, StoreError};
use std::path::Path;
use std::sync::Arc;

/// Operations every backend supports, independent of its wire protocol.
///
/// Implementations must tolerate concurrent `get` calls on one handle; the
/// load generator shares a single handle across all tasks of a burst.
#[async_trait::async_trait]
pub trait StoreClient: Send + Sync {
    /// Mirror every key under `root` into files below `destination`.
    async fn dump(&self, root: &str, destination: &Path) -> Result<DumpStats, StoreError>;

    /// Read the value of a single key.
    ///
    /// Returns `StoreError::NotFound` when the key does not exist.
    async fn get(&self, key: &str) -> Result<Vec<u8>, StoreError>;

    /// Protocol spoken by this handle.
    fn protocol(&self) -> ProtocolVersion;
}

/// Produces fresh client handles, one connection per call.
#[async_trait::async_trait]
pub trait StoreClientFactory: Send + Sync {
    async fn connect(&self) -> Result<Arc<dyn StoreClient>, StoreError>;
}
