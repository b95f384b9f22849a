//! webrpc HTTP Host Adapter
//!
//! Mounts [`webrpc_core::Service`]s on an axum router: every request under
//! a service prefix goes through the dispatcher, everything else gets the
//! host's own plain 404.

pub mod error;
pub mod handler;
pub mod server;
pub mod types;

pub use error::ServerError;
pub use server::{RpcServer, RpcServerConfig, ServerHandle};
pub use types::TRACE_ID_HEADER;
