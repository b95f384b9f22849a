// Example service: handler trait and registration

use crate::types::*;
use async_trait::async_trait;
use std::sync::Arc;
use webrpc_core::application::DEFAULT_BASE_PATH;
use webrpc_core::{BuildError, RequestContext, Service};

/// Handlers of the `Example` service.
///
/// Return a [`WebrpcError`](webrpc_core::WebrpcError) (possibly wrapped in
/// `anyhow` context) to send a specific error kind; any other failure is
/// reported as a server panic.
#[async_trait]
pub trait ExampleServer: Send + Sync {
    async fn ping(&self, ctx: &RequestContext, args: PingArgs) -> anyhow::Result<PingReturn>;

    async fn get_user(
        &self,
        ctx: &RequestContext,
        args: GetUserArgs,
    ) -> anyhow::Result<GetUserReturn>;

    async fn get_article(
        &self,
        ctx: &RequestContext,
        args: GetArticleArgs,
    ) -> anyhow::Result<GetArticleReturn>;
}

/// Bind `server` to the `Example` service under `/rpc`.
pub fn example_service<S>(server: Arc<S>) -> Result<Service<RequestContext>, BuildError>
where
    S: ExampleServer + 'static,
{
    example_service_at(server, DEFAULT_BASE_PATH)
}

/// Bind `server` to the `Example` service under a custom base path.
pub fn example_service_at<S>(
    server: Arc<S>,
    base_path: &str,
) -> Result<Service<RequestContext>, BuildError>
where
    S: ExampleServer + 'static,
{
    let ping = server.clone();
    let get_user = server.clone();
    let get_article = server;

    Service::<RequestContext>::builder(&EXAMPLE_SERVICE)
        .base_path(base_path)
        .method("Ping", move |ctx, args: PingArgs| {
            let server = ping.clone();
            Box::pin(async move { server.ping(ctx, args).await })
        })
        .method("GetUser", move |ctx, args: GetUserArgs| {
            let server = get_user.clone();
            Box::pin(async move { server.get_user(ctx, args).await })
        })
        .method("GetArticle", move |ctx, args: GetArticleArgs| {
            let server = get_article.clone();
            Box::pin(async move { server.get_article(ctx, args).await })
        })
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ACCESS_DENIED;
    use serde_json::json;
    use std::collections::BTreeMap;
    use webrpc_core::WebrpcError;

    struct Fixed;

    #[async_trait]
    impl ExampleServer for Fixed {
        async fn ping(&self, ctx: &RequestContext, _args: PingArgs) -> anyhow::Result<PingReturn> {
            ctx.set("pinged", json!(true));
            Ok(PingReturn {})
        }

        async fn get_user(
            &self,
            _ctx: &RequestContext,
            args: GetUserArgs,
        ) -> anyhow::Result<GetUserReturn> {
            if args.user_id == 911 {
                return Err(WebrpcError::schema(&ACCESS_DENIED)
                    .with_cause("User 911 is forbidden")
                    .into());
            }
            Ok(GetUserReturn {
                code: 1,
                user: User {
                    id: args.user_id,
                    username: "webrpcfan".to_string(),
                    role: Kind::Admin,
                    meta: BTreeMap::new(),
                    created_at: None,
                },
            })
        }

        async fn get_article(
            &self,
            _ctx: &RequestContext,
            args: GetArticleArgs,
        ) -> anyhow::Result<GetArticleReturn> {
            Ok(GetArticleReturn {
                title: format!("Example Article #{}", args.article_id),
                content: None,
            })
        }
    }

    fn service() -> Service<RequestContext> {
        example_service(Arc::new(Fixed)).unwrap()
    }

    #[tokio::test]
    async fn test_get_user_big_id() {
        let ctx = RequestContext::new();
        let result = service()
            .dispatch(
                "/rpc/Example/GetUser",
                br#"{"userId":"18446744073709551615"}"#,
                &ctx,
            )
            .await
            .unwrap();
        assert_eq!(result.status, 200);
        assert_eq!(result.body["user"]["id"], json!("18446744073709551615"));
        assert_eq!(result.body["user"]["role"], json!("ADMIN"));
    }

    #[tokio::test]
    async fn test_get_user_forbidden() {
        let ctx = RequestContext::new();
        let result = service()
            .dispatch("/rpc/Example/GetUser", br#"{"userId":"911"}"#, &ctx)
            .await
            .unwrap();
        assert_eq!(result.status, 403);
        assert_eq!(
            result.body,
            json!({
                "code": 6,
                "name": "AccessDenied",
                "message": "access denied",
                "status": 403,
                "cause": "User 911 is forbidden"
            })
        );
    }

    #[tokio::test]
    async fn test_ping_touches_context() {
        let ctx = RequestContext::new();
        let result = service()
            .dispatch("/rpc/Example/Ping", b"", &ctx)
            .await
            .unwrap();
        assert_eq!(result.status, 200);
        assert_eq!(result.body, json!({}));
        assert_eq!(ctx.get("pinged"), Some(json!(true)));
    }

    #[tokio::test]
    async fn test_custom_base_path() {
        let service = example_service_at(Arc::new(Fixed), "/api").unwrap();
        assert_eq!(service.prefix(), "/api/Example/");

        let ctx = RequestContext::new();
        let result = service
            .dispatch("/api/Example/GetArticle", br#"{"articleId":"7"}"#, &ctx)
            .await
            .unwrap();
        assert_eq!(result.body, json!({"title": "Example Article #7"}));
        assert!(service.dispatch("/rpc/Example/Ping", b"", &ctx).await.is_none());
    }
}
