//! Data model shared by the backends and the dump engine.

use serde::{Deserialize, Deserializer};

/// One entry of the v2 hierarchical namespace.
///
/// Deserializes straight from the `node` object of a v2 keys API response.
/// The root node of a response carries no `key` field, hence the default.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct KeyNode {
    #[serde(default)]
    pub key: String,
    #[serde(default, deserialize_with = "string_bytes")]
    pub value: Vec<u8>,
    #[serde(default, rename = "dir")]
    pub is_dir: bool,
    /// Children in server order.
    #[serde(default, rename = "nodes")]
    pub children: Vec<KeyNode>,
}

impl KeyNode {
    pub fn leaf(key: impl Into<String>, value: impl Into<Vec<u8>>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
            is_dir: false,
            children: Vec::new(),
        }
    }

    pub fn dir(key: impl Into<String>, children: Vec<KeyNode>) -> Self {
        Self {
            key: key.into(),
            value: Vec::new(),
            is_dir: true,
            children,
        }
    }
}

fn string_bytes<'de, D>(deserializer: D) -> Result<Vec<u8>, D::Error>
where
    D: Deserializer<'de>,
{
    let value: Option<String> = Option::deserialize(deserializer)?;
    Ok(value.map(String::into_bytes).unwrap_or_default())
}

/// One key/value pair returned by a v3 range scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlatEntry {
    pub key: String,
    pub value: Vec<u8>,
}

impl FlatEntry {
    pub fn new(key: impl Into<String>, value: impl Into<Vec<u8>>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// What a dump wrote.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DumpStats {
    pub files_written: u64,
    pub bytes_written: u64,
}

impl DumpStats {
    pub fn record(&mut self, bytes: usize) {
        self.files_written += 1;
        self.bytes_written += bytes as u64;
    }
}
