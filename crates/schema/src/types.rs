// Example schema types and shape descriptors

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use webrpc_core::domain::EMPTY;
use webrpc_core::{Field, MethodDef, ServiceDefinition, Shape};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Kind {
    #[serde(rename = "USER")]
    User,
    #[serde(rename = "ADMIN")]
    Admin,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: u64,
    #[serde(rename = "USERNAME")]
    pub username: String,
    pub role: Kind,
    #[serde(default)]
    pub meta: BTreeMap<String, Value>,
    #[serde(
        rename = "createdAt",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PingArgs {}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PingReturn {}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GetUserArgs {
    #[serde(rename = "userId")]
    pub user_id: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GetUserReturn {
    pub code: u32,
    pub user: User,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GetArticleArgs {
    #[serde(rename = "articleId")]
    pub article_id: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GetArticleReturn {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub id: u64,
    #[serde(rename = "userId")]
    pub user_id: u64,
    pub timestamp: i64,
    pub content: String,
}

/// Payload exercising WireIntegers inside arrays and nested objects.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BigIntArrayTest {
    pub ids: Vec<u64>,
    pub timestamps: Vec<i64>,
    pub messages: Vec<Message>,
}

// Shapes

pub const KIND: Shape = Shape::Enum(&["USER", "ADMIN"]);

pub const USER: Shape = Shape::Object(&[
    Field::required("id", Shape::Uint64),
    Field::required("USERNAME", Shape::String),
    Field::required("role", KIND),
    Field::required("meta", Shape::Map(&Shape::Any)),
    Field::optional("createdAt", Shape::String),
]);

pub const GET_USER_ARGS: Shape = Shape::Object(&[Field::required("userId", Shape::Uint64)]);

pub const GET_USER_RETURN: Shape = Shape::Object(&[
    Field::required("code", Shape::Number),
    Field::required("user", USER),
]);

pub const GET_ARTICLE_ARGS: Shape = Shape::Object(&[Field::required("articleId", Shape::Uint64)]);

pub const GET_ARTICLE_RETURN: Shape = Shape::Object(&[
    Field::required("title", Shape::String),
    Field::optional("content", Shape::String),
]);

pub const MESSAGE: Shape = Shape::Object(&[
    Field::required("id", Shape::Uint64),
    Field::required("userId", Shape::Uint64),
    Field::required("timestamp", Shape::Int64),
    Field::required("content", Shape::String),
]);

pub const BIG_INT_ARRAY_TEST: Shape = Shape::Object(&[
    Field::required("ids", Shape::Array(&Shape::Uint64)),
    Field::required("timestamps", Shape::Array(&Shape::Int64)),
    Field::required("messages", Shape::Array(&MESSAGE)),
]);

// Service

pub const PING: MethodDef = MethodDef {
    name: "Ping",
    args: EMPTY,
    returns: EMPTY,
};

pub const GET_USER: MethodDef = MethodDef {
    name: "GetUser",
    args: GET_USER_ARGS,
    returns: GET_USER_RETURN,
};

pub const GET_ARTICLE: MethodDef = MethodDef {
    name: "GetArticle",
    args: GET_ARTICLE_ARGS,
    returns: GET_ARTICLE_RETURN,
};

pub static EXAMPLE_SERVICE: ServiceDefinition = ServiceDefinition {
    name: "Example",
    schema_name: crate::SCHEMA_NAME,
    schema_version: crate::SCHEMA_VERSION,
    methods: &[PING, GET_USER, GET_ARTICLE],
};
