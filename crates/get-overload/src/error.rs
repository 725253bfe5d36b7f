//! Error types for the load generator.

use etcd_store::StoreError;
use thiserror::Error;

/// Errors that abort a load run.
#[derive(Error, Debug)]
pub enum LoadTestError {
    /// The plan cannot be executed.
    #[error("Invalid load test plan: {0}")]
    InvalidPlan(String),

    /// A burst could not obtain its client.
    #[error("Failed to connect for burst {burst}: {source}")]
    Connect {
        burst: u64,
        #[source]
        source: StoreError,
    },

    /// A read failed.
    #[error("Get failed in burst {burst}: {source}")]
    Get {
        burst: u64,
        #[source]
        source: StoreError,
    },

    /// A request task panicked or was cancelled.
    #[error("Request task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}
