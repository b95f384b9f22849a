//! webrpc Client Implementation

use crate::error::{bad_request, bad_response, request_failed, Result};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, CONTENT_TYPE};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;
use tracing::{debug, warn};
use webrpc_core::application::DEFAULT_BASE_PATH;
use webrpc_core::domain::{Headers, SchemaHeader, APPLICATION_JSON, WEBRPC_HEADER};
use webrpc_core::{codec, ErrorTable, MethodDef, ServiceDefinition, WebrpcError};

/// Request timeout used when the caller does not bring its own client
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Transport shared by the generated client stubs of one service.
///
/// Every call is a `POST <hostname><base>/<Service>/<Method>` with a JSON
/// body; every failure comes back as a [`WebrpcError`].
#[derive(Clone)]
pub struct WebrpcClient {
    http: reqwest::Client,
    hostname: String,
    prefix: String,
    definition: &'static ServiceDefinition,
    table: ErrorTable,
    header: String,
}

impl WebrpcClient {
    /// Create a client for `definition` served at `hostname`
    ///
    /// # Arguments
    ///
    /// * `hostname` - Scheme and authority, e.g. `http://127.0.0.1:3000`
    /// * `table` - Error table used to type error responses
    pub fn new(
        hostname: impl Into<String>,
        definition: &'static ServiceDefinition,
        table: ErrorTable,
    ) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(DEFAULT_TIMEOUT)
            .build()
            .map_err(|e| request_failed("build", &e))?;
        Ok(Self::with_http_client(http, hostname, definition, table))
    }

    /// Create a client on top of a caller-configured HTTP client
    pub fn with_http_client(
        http: reqwest::Client,
        hostname: impl Into<String>,
        definition: &'static ServiceDefinition,
        table: ErrorTable,
    ) -> Self {
        let hostname = hostname.into().trim_end_matches('/').to_string();
        Self {
            http,
            hostname,
            prefix: format!("{}/{}/", DEFAULT_BASE_PATH, definition.name),
            definition,
            table,
            header: definition.header_value(),
        }
    }

    /// Talk to a server mounted under a different base path
    pub fn with_base_path(mut self, base_path: &str) -> Self {
        self.prefix = format!(
            "{}/{}/",
            base_path.trim_end_matches('/'),
            self.definition.name
        );
        self
    }

    pub fn definition(&self) -> &'static ServiceDefinition {
        self.definition
    }

    /// Full URL of a method
    pub fn url(&self, method: &MethodDef) -> String {
        format!("{}{}{}", self.hostname, self.prefix, method.name)
    }

    /// Invoke one method.
    ///
    /// `headers` are sent as-is, except that `Content-Type` is always
    /// `application/json`.
    pub async fn call<A, R>(
        &self,
        method: &'static MethodDef,
        args: &A,
        headers: Option<&Headers>,
    ) -> Result<R>
    where
        A: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let body = codec::to_string(args, &method.args).map_err(|e| bad_request(&e))?;
        let url = self.url(method);
        debug!(url = %url, "Calling webrpc method");

        let response = self
            .http
            .post(&url)
            .headers(self.request_headers(headers)?)
            .body(body)
            .send()
            .await
            .map_err(|e| request_failed("send", &e))?;

        let status = response.status().as_u16();
        self.check_schema_header(response.headers());

        let text = response.text().await.map_err(|e| {
            WebrpcError::bad_response()
                .with_status(status)
                .with_cause(format!("read response body: {}", e))
        })?;

        if !(200..300).contains(&status) {
            return Err(WebrpcError::from_response_body(status, &text, &self.table));
        }

        // Unlike request bodies, an empty response is not `{}`.
        let value: serde_json::Value = serde_json::from_str(&text)
            .map_err(|e| bad_response(status, format!("invalid JSON: {}", e), &text))?;
        codec::decode_as(&value, &method.returns)
            .map_err(|e| bad_response(status, format!("decode {}: {}", method.name, e), &text))
    }

    fn request_headers(&self, extra: Option<&Headers>) -> Result<HeaderMap> {
        let mut map = HeaderMap::new();
        for (name, value) in extra.into_iter().flatten() {
            let name = HeaderName::from_bytes(name.as_bytes()).map_err(|e| {
                WebrpcError::request_failed().with_cause(format!("header {}: {}", name, e))
            })?;
            let value = HeaderValue::from_str(value).map_err(|e| {
                WebrpcError::request_failed().with_cause(format!("header {}: {}", name, e))
            })?;
            map.insert(name, value);
        }

        map.insert(CONTENT_TYPE, HeaderValue::from_static(APPLICATION_JSON));
        if let Ok(value) = HeaderValue::from_str(&self.header) {
            map.insert(HeaderName::from_static("webrpc"), value);
        }
        Ok(map)
    }

    fn check_schema_header(&self, headers: &HeaderMap) {
        let Some(value) = headers.get(WEBRPC_HEADER).and_then(|v| v.to_str().ok()) else {
            return;
        };
        match SchemaHeader::parse(value) {
            Some(remote)
                if remote.schema_name == self.definition.schema_name
                    && remote.schema_version == self.definition.schema_version => {}
            Some(remote) => warn!(
                expected = %self.header,
                received = value,
                schema = %remote.schema_name,
                "Server speaks a different schema version"
            ),
            None => warn!(received = value, "Unparseable webrpc header"),
        }
    }
}

impl std::fmt::Debug for WebrpcClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WebrpcClient")
            .field("hostname", &self.hostname)
            .field("prefix", &self.prefix)
            .field("service", &self.definition.name)
            .finish()
    }
}
