//! Client configuration.

use crate::StoreError;
use reqwest::Url;
use std::path::PathBuf;

/// PEM files used to authenticate against the cluster.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TlsPaths {
    pub cert_path: PathBuf,
    pub key_path: PathBuf,
    pub ca_path: PathBuf,
}

/// Connection settings handed to the client factory.
///
/// Built once from the command line and never mutated afterwards.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    tls: Option<TlsPaths>,
    endpoints: Vec<Url>,
}

impl ClientConfig {
    /// Validate the endpoint list and build a configuration.
    ///
    /// Endpoints without a scheme get `https://` when TLS material is
    /// configured and `http://` otherwise.
    pub fn new<S: AsRef<str>>(endpoints: &[S], tls: Option<TlsPaths>) -> Result<Self, StoreError> {
        let default_scheme = if tls.is_some() { "https" } else { "http" };

        let endpoints = endpoints
            .iter()
            .map(|e| e.as_ref().trim())
            .filter(|e| !e.is_empty())
            .map(|e| parse_endpoint(e, default_scheme))
            .collect::<Result<Vec<_>, _>>()?;

        if endpoints.is_empty() {
            return Err(StoreError::Setup(
                "At least one endpoint is required".to_string(),
            ));
        }

        Ok(Self { tls, endpoints })
    }

    pub fn tls(&self) -> Option<&TlsPaths> {
        self.tls.as_ref()
    }

    pub fn endpoints(&self) -> &[Url] {
        &self.endpoints
    }
}

fn parse_endpoint(endpoint: &str, default_scheme: &str) -> Result<Url, StoreError> {
    let with_scheme = if endpoint.contains("://") {
        endpoint.to_string()
    } else {
        format!("{default_scheme}://{endpoint}")
    };

    let url = Url::parse(&with_scheme)
        .map_err(|e| StoreError::Setup(format!("Invalid endpoint '{endpoint}': {e}")))?;

    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(StoreError::Setup(format!(
            "Unsupported scheme '{other}' in endpoint '{endpoint}'"
        ))),
    }
}
