//! Handler Failure Tests
//!
//! How handler failures (typed errors, plain errors, panics) reach the client.

use anyhow::Context;
use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use webrpc_core::{ProtocolError, RequestContext, WebrpcError};
use webrpc_example_schema::errors::{DATABASE_DOWN, NOT_IMPLEMENTED};
use webrpc_example_schema::{
    example_service, ExampleClient, ExampleServer, GetArticleArgs, GetArticleReturn, GetUserArgs,
    GetUserReturn, PingArgs, PingReturn,
};
use webrpc_server::{RpcServer, RpcServerConfig, ServerHandle};

/// Every method misbehaves in a different way.
struct Faulty {
    calls: AtomicUsize,
}

#[async_trait]
impl ExampleServer for Faulty {
    async fn ping(&self, _ctx: &RequestContext, _args: PingArgs) -> anyhow::Result<PingReturn> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        anyhow::bail!("connection pool exhausted")
    }

    async fn get_user(
        &self,
        _ctx: &RequestContext,
        args: GetUserArgs,
    ) -> anyhow::Result<GetUserReturn> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if args.user_id == 0 {
            panic!("user zero is cursed");
        }
        Err(WebrpcError::schema(&DATABASE_DOWN).with_cause("primary unreachable"))
            .context("loading user")
    }

    async fn get_article(
        &self,
        _ctx: &RequestContext,
        _args: GetArticleArgs,
    ) -> anyhow::Result<GetArticleReturn> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(WebrpcError::schema(&NOT_IMPLEMENTED).into())
    }
}

async fn start(faulty: Arc<Faulty>) -> ServerHandle {
    RpcServer::new(RpcServerConfig {
        port: 0,
        ..RpcServerConfig::default()
    })
    .register(example_service(faulty).unwrap())
    .start()
    .await
    .unwrap()
}

fn faulty() -> Arc<Faulty> {
    Arc::new(Faulty {
        calls: AtomicUsize::new(0),
    })
}

#[tokio::test]
async fn test_plain_error_becomes_server_panic() {
    let server = start(faulty()).await;
    let client = ExampleClient::new(server.url()).unwrap();

    let err = client.ping(None).await.unwrap_err();
    assert_eq!(err.protocol_kind(), Some(ProtocolError::ServerPanic));
    assert_eq!(err.code, -6);
    assert_eq!(err.status, 500);
    assert_eq!(err.cause.as_deref(), Some("connection pool exhausted"));

    server.stop().await.unwrap();
}

#[tokio::test]
async fn test_typed_error_survives_context() {
    let server = start(faulty()).await;
    let client = ExampleClient::new(server.url()).unwrap();

    let err = client
        .get_user(&GetUserArgs { user_id: 5 }, None)
        .await
        .unwrap_err();
    assert!(err.is(&DATABASE_DOWN));
    assert_eq!(err.status, 503);
    assert_eq!(err.message, "service outage");
    assert_eq!(err.cause.as_deref(), Some("primary unreachable"));

    server.stop().await.unwrap();
}

#[tokio::test]
async fn test_panic_is_contained() {
    let handler = faulty();
    let server = start(handler.clone()).await;
    let client = ExampleClient::new(server.url()).unwrap();

    let err = client
        .get_user(&GetUserArgs { user_id: 0 }, None)
        .await
        .unwrap_err();
    assert_eq!(err.protocol_kind(), Some(ProtocolError::ServerPanic));
    assert_eq!(err.cause.as_deref(), Some("user zero is cursed"));

    // The server keeps serving after a panic.
    let err = client
        .get_article(&GetArticleArgs { article_id: 1 }, None)
        .await
        .unwrap_err();
    assert!(err.is(&NOT_IMPLEMENTED));
    assert_eq!(err.status, 501);
    assert_eq!(handler.calls.load(Ordering::SeqCst), 2);

    server.stop().await.unwrap();
}
