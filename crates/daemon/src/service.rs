//! In-memory implementation of the `Example` service

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use serde_json::json;
use std::collections::{BTreeMap, HashMap};
use tracing::debug;
use webrpc_core::{RequestContext, WebrpcError};
use webrpc_example_schema::errors::{ACCESS_DENIED, USER_NOT_FOUND};
use webrpc_example_schema::{
    ExampleServer, GetArticleArgs, GetArticleReturn, GetUserArgs, GetUserReturn, Kind, PingArgs,
    PingReturn, User,
};

/// The one user id nobody may look up
pub const FORBIDDEN_USER_ID: u64 = 911;

/// Example service backed by a fixed user table
pub struct ExampleService {
    users: HashMap<u64, User>,
}

impl ExampleService {
    pub fn new() -> Self {
        let mut meta = BTreeMap::new();
        meta.insert("favouriteColor".to_string(), json!("blue"));

        let users = [
            User {
                id: 1,
                username: "webrpcfan".to_string(),
                role: Kind::Admin,
                meta,
                created_at: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).single(),
            },
            User {
                id: 2,
                username: "rustacean".to_string(),
                role: Kind::User,
                meta: BTreeMap::new(),
                created_at: None,
            },
        ];

        Self {
            users: users.into_iter().map(|u| (u.id, u)).collect(),
        }
    }

    /// Add or replace a user
    pub fn with_user(mut self, user: User) -> Self {
        self.users.insert(user.id, user);
        self
    }
}

impl Default for ExampleService {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ExampleServer for ExampleService {
    async fn ping(&self, ctx: &RequestContext, _args: PingArgs) -> anyhow::Result<PingReturn> {
        ctx.set("pingedAt", json!(Utc::now().to_rfc3339()));
        debug!(request_id = %ctx.request_id, "Ping");
        Ok(PingReturn {})
    }

    async fn get_user(
        &self,
        ctx: &RequestContext,
        args: GetUserArgs,
    ) -> anyhow::Result<GetUserReturn> {
        debug!(request_id = %ctx.request_id, user_id = args.user_id, "GetUser");

        if args.user_id == FORBIDDEN_USER_ID {
            return Err(WebrpcError::schema(&ACCESS_DENIED)
                .with_cause(format!("User {} is forbidden", args.user_id))
                .into());
        }

        match self.users.get(&args.user_id) {
            Some(user) => Ok(GetUserReturn {
                code: 1,
                user: user.clone(),
            }),
            None => Err(WebrpcError::schema(&USER_NOT_FOUND)
                .with_cause(format!("no user with id {}", args.user_id))
                .into()),
        }
    }

    async fn get_article(
        &self,
        ctx: &RequestContext,
        args: GetArticleArgs,
    ) -> anyhow::Result<GetArticleReturn> {
        debug!(request_id = %ctx.request_id, article_id = args.article_id, "GetArticle");
        Ok(GetArticleReturn {
            title: format!("Example Article #{}", args.article_id),
            content: Some("This is an example article fetched from the server.".to_string()),
        })
    }
}
