// Per-call request/result values

use std::collections::BTreeMap;

/// Protocol header carrying the schema identity
pub const WEBRPC_HEADER: &str = "Webrpc";
pub const CONTENT_TYPE: &str = "Content-Type";
pub const APPLICATION_JSON: &str = "application/json";

/// An inbound call resolved against a service prefix.
///
/// Fields are private: the value is fixed once parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RpcRequest {
    service_path: String,
    method_name: String,
    raw_body: Vec<u8>,
}

impl RpcRequest {
    /// Split `url_path` into prefix and method name.
    ///
    /// Returns `None` when the path is outside `prefix`. A query string is
    /// ignored; no other normalisation (case, trailing slash) is applied.
    pub fn parse(prefix: &str, url_path: &str, raw_body: &[u8]) -> Option<Self> {
        let path = url_path.split_once('?').map_or(url_path, |(p, _)| p);
        let method_name = path.strip_prefix(prefix)?;
        Some(Self {
            service_path: prefix.to_string(),
            method_name: method_name.to_string(),
            raw_body: raw_body.to_vec(),
        })
    }

    pub fn service_path(&self) -> &str {
        &self.service_path
    }

    pub fn method_name(&self) -> &str {
        &self.method_name
    }

    pub fn raw_body(&self) -> &[u8] {
        &self.raw_body
    }
}

/// Response headers: ordered by name, one value per name
pub type Headers = BTreeMap<String, String>;

/// What the dispatcher hands back to the host adapter.
#[derive(Debug, Clone, PartialEq)]
pub struct RpcResult {
    pub status: u16,
    pub headers: Headers,
    pub body: serde_json::Value,
}

impl RpcResult {
    /// JSON result carrying the content type and protocol headers
    pub fn json(status: u16, schema_header: &str, body: serde_json::Value) -> Self {
        let mut headers = Headers::new();
        headers.insert(CONTENT_TYPE.to_string(), APPLICATION_JSON.to_string());
        headers.insert(WEBRPC_HEADER.to_string(), schema_header.to_string());
        Self {
            status,
            headers,
            body,
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).map(String::as_str)
    }
}
