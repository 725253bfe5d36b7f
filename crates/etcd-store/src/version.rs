//! Protocol version enumeration.

/// etcd API selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProtocolVersion {
    /// v2 keys API: hierarchical, whole subtrees in one recursive fetch
    V2,
    /// v3 KV API: flat keys, prefix range scans
    V3,
}

impl ProtocolVersion {
    /// Whether a server with the given major version serves this API.
    ///
    /// v3 servers can still expose the v2 keys API when started with
    /// `--enable-v2`, so v2 is accepted against any server.
    pub fn supported_by(&self, server_major: u64) -> bool {
        match self {
            Self::V2 => server_major >= 2,
            Self::V3 => server_major >= 3,
        }
    }
}

impl Default for ProtocolVersion {
    fn default() -> Self {
        Self::V2
    }
}

impl std::fmt::Display for ProtocolVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::V2 => write!(f, "v2"),
            Self::V3 => write!(f, "v3"),
        }
    }
}

impl std::str::FromStr for ProtocolVersion {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "v2" | "2" => Ok(Self::V2),
            "v3" | "3" => Ok(Self::V3),
            _ => Err(anyhow::anyhow!(
                "Invalid protocol version: '{s}'. Expected 'v2' or 'v3'"
            )),
        }
    }
}
