// Example service: typed client stub

use crate::errors::error_table;
use crate::types::*;
use webrpc_core::domain::Headers;
use webrpc_core::WebrpcError;
use webrpc_sdk::{Result, WebrpcClient};

/// Client for the `Example` service.
#[derive(Debug, Clone)]
pub struct ExampleClient {
    inner: WebrpcClient,
}

impl ExampleClient {
    /// Connect to an `Example` server at `hostname` (e.g. `http://127.0.0.1:3000`)
    pub fn new(hostname: impl Into<String>) -> Result<Self> {
        let table = error_table().map_err(|e| {
            WebrpcError::request_failed().with_cause(format!("error table: {}", e))
        })?;
        let inner = WebrpcClient::new(hostname, &EXAMPLE_SERVICE, table.clone())?;
        Ok(Self { inner })
    }

    /// Wrap an already configured transport.
    pub fn from_client(inner: WebrpcClient) -> Self {
        Self { inner }
    }

    pub fn with_base_path(self, base_path: &str) -> Self {
        Self {
            inner: self.inner.with_base_path(base_path),
        }
    }

    pub async fn ping(&self, headers: Option<&Headers>) -> Result<PingReturn> {
        self.inner.call(&PING, &PingArgs {}, headers).await
    }

    pub async fn get_user(
        &self,
        args: &GetUserArgs,
        headers: Option<&Headers>,
    ) -> Result<GetUserReturn> {
        self.inner.call(&GET_USER, args, headers).await
    }

    pub async fn get_article(
        &self,
        args: &GetArticleArgs,
        headers: Option<&Headers>,
    ) -> Result<GetArticleReturn> {
        self.inner.call(&GET_ARTICLE, args, headers).await
    }
}
