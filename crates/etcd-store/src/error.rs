//! Error types for store clients.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while connecting to, reading from, or dumping an etcd store.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Invalid configuration or no usable endpoint.
    #[error("Setup error: {0}")]
    Setup(String),

    /// TLS material could not be read.
    #[error("Failed to read TLS material {}: {source}", path.display())]
    TlsMaterial {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Point lookup found nothing.
    #[error("Key not found: {key}")]
    NotFound { key: String },

    /// The request never produced a response.
    #[error("Request for key {key} failed: {source}")]
    Request {
        key: String,
        #[source]
        source: reqwest::Error,
    },

    /// The store answered with an error.
    #[error("Store returned an error for key {key}: {message}")]
    Response { key: String, message: String },

    /// The response could not be decoded or violates the data model.
    #[error("Malformed response for key {key}: {message}")]
    Malformed { key: String, message: String },

    /// Writing the dump output failed.
    #[error("Failed to write {} for key {key}: {source}", path.display())]
    Io {
        key: String,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Coarse classification used by callers deciding how to report a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Setup,
    Protocol,
    Io,
}

impl StoreError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Setup(_) | Self::TlsMaterial { .. } => ErrorKind::Setup,
            Self::NotFound { .. }
            | Self::Request { .. }
            | Self::Response { .. }
            | Self::Malformed { .. } => ErrorKind::Protocol,
            Self::Io { .. } => ErrorKind::Io,
        }
    }

    /// The key the failure is attributed to, if any.
    pub fn key(&self) -> Option<&str> {
        match self {
            Self::Setup(_) | Self::TlsMaterial { .. } => None,
            Self::NotFound { key }
            | Self::Request { key, .. }
            | Self::Response { key, .. }
            | Self::Malformed { key, .. }
            | Self::Io { key, .. } => Some(key),
        }
    }

    pub fn malformed(key: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Malformed {
            key: key.into(),
            message: message.into(),
        }
    }
}
