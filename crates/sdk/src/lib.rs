//! webrpc SDK - HTTP transport for generated client stubs
//!
//! Generated stubs hold a [`WebrpcClient`] and call [`WebrpcClient::call`]
//! with the static [`MethodDef`](webrpc_core::MethodDef) of each method.
//!
//! # Example
//!
//! ```no_run
//! use webrpc_core::{ErrorTable, Field, MethodDef, ServiceDefinition, Shape};
//! use webrpc_sdk::WebrpcClient;
//! use serde_json::{json, Value};
//!
//! static GET_USER: MethodDef = MethodDef {
//!     name: "GetUser",
//!     args: Shape::Object(&[Field::required("userId", Shape::Uint64)]),
//!     returns: Shape::Any,
//! };
//! static SERVICE: ServiceDefinition = ServiceDefinition {
//!     name: "Example",
//!     schema_name: "example",
//!     schema_version: "v1.0.0",
//!     methods: &[],
//! };
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = WebrpcClient::new("http://127.0.0.1:3000", &SERVICE, ErrorTable::protocol_only())?;
//!     let user: Value = client.call(&GET_USER, &json!({"userId": 1}), None).await?;
//!     println!("{}", user);
//!     Ok(())
//! }
//! ```

mod client;
mod error;

pub use client::{WebrpcClient, DEFAULT_TIMEOUT};
pub use error::Result;
pub use webrpc_core::domain::Headers;
pub use webrpc_core::WebrpcError;
