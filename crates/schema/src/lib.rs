//! Example webrpc schema (`example@v1.0.0`)
//!
//! Laid out the way the code generator emits a schema package:
//! - `types`: data types and their wire shapes
//! - `errors`: schema-defined error kinds
//! - `server`: handler trait and its dispatcher registration
//! - `client`: typed client stub

pub mod client;
pub mod errors;
pub mod server;
pub mod types;

pub use client::ExampleClient;
pub use errors::error_table;
pub use server::{example_service, example_service_at, ExampleServer};
pub use types::*;

pub const SCHEMA_NAME: &str = "example";
pub const SCHEMA_VERSION: &str = "v1.0.0";
