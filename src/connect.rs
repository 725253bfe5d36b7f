use async_trait::async_trait;
use etcd2_client::Etcd2Client;
use etcd3_client::Etcd3Client;
use etcd_store::{ClientConfig, ProtocolVersion, StoreClient, StoreClientFactory, StoreError};
use std::sync::Arc;

// Connect to etcd with the selected protocol
pub async fn connect_store(
    config: &ClientConfig,
    protocol: ProtocolVersion,
) -> Result<Arc<dyn StoreClient>, StoreError> {
    tracing::debug!(
        "Connecting to etcd ({protocol}) via {} endpoint(s)",
        config.endpoints().len()
    );

    let client: Arc<dyn StoreClient> = match protocol {
        ProtocolVersion::V2 => Arc::new(Etcd2Client::connect(config).await?),
        ProtocolVersion::V3 => Arc::new(Etcd3Client::connect(config).await?),
    };
    Ok(client)
}

/// Client factory used by the load generator: a fresh handle per call.
#[derive(Debug, Clone)]
pub struct EtcdConnector {
    config: ClientConfig,
    protocol: ProtocolVersion,
}

impl EtcdConnector {
    pub fn new(config: ClientConfig, protocol: ProtocolVersion) -> Self {
        Self { config, protocol }
    }
}

#[async_trait]
impl StoreClientFactory for EtcdConnector {
    async fn connect(&self) -> Result<Arc<dyn StoreClient>, StoreError> {
        connect_store(&self.config, self.protocol).await
    }
}
