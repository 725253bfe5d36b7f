//! JSON gateway bodies for `/v3/kv/range`.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use serde::{Deserialize, Serialize};

/// Smallest key greater than every key starting with `prefix`.
///
/// Trailing `0xff` bytes cannot be incremented and are dropped; a prefix made
/// only of `0xff` (or empty) has no upper bound, which etcd spells `\0`.
pub fn prefix_range_end(prefix: &[u8]) -> Vec<u8> {
    let mut end = prefix.to_vec();
    while let Some(last) = end.pop() {
        if last < 0xff {
            end.push(last + 1);
            return end;
        }
    }
    vec![0]
}

#[derive(Debug, Serialize)]
pub(crate) struct RangeRequest {
    pub key: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub range_end: Option<String>,
}

impl RangeRequest {
    pub fn new(key: &[u8], range_end: Option<&[u8]>) -> Self {
        Self {
            key: BASE64.encode(key),
            range_end: range_end.map(|end| BASE64.encode(end)),
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct RangeResponse {
    #[serde(default)]
    pub kvs: Vec<KeyValue>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct KeyValue {
    #[serde(default)]
    pub key: String,
    #[serde(default)]
    pub value: String,
}

/// Error body of the gateway, e.g.
/// `{"error":"etcdserver: user name is empty","code":3,"message":"..."}`.
#[derive(Debug, Deserialize)]
pub(crate) struct GatewayError {
    #[serde(default)]
    pub error: String,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub code: i64,
}

impl GatewayError {
    pub fn describe(&self) -> String {
        let text = if self.message.is_empty() {
            &self.error
        } else {
            &self.message
        };
        format!("{text} (code {})", self.code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prefix_range_end() {
        assert_eq!(prefix_range_end(b"/config"), b"/confih".to_vec());
        assert_eq!(prefix_range_end(b"a\xff"), b"b".to_vec());
        assert_eq!(prefix_range_end(b"\xff\xff"), vec![0]);
        assert_eq!(prefix_range_end(b""), vec![0]);
    }

    #[test]
    fn test_range_request_encoding() {
        let end = prefix_range_end(b"/config");
        let request = RangeRequest::new(b"/config", Some(end.as_slice()));
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["key"], "L2NvbmZpZw==");
        assert_eq!(json["range_end"], "L2NvbmZpaA==");

        let json = serde_json::to_value(RangeRequest::new(b"/k", None)).unwrap();
        assert!(json.get("range_end").is_none());
    }

    #[test]
    fn test_range_response_without_kvs() {
        let response: RangeResponse =
            serde_json::from_str(r#"{"header":{"revision":"9"}}"#).unwrap();
        assert!(response.kvs.is_empty());
    }

    #[test]
    fn test_gateway_error_describe() {
        let error: GatewayError =
            serde_json::from_str(r#"{"error":"permission denied","code":7}"#).unwrap();
        assert_eq!(error.describe(), "permission denied (code 7)");
    }
}
