//! Server Error Types

use std::net::SocketAddr;
use thiserror::Error;

/// Startup and shutdown failures of the HTTP host
#[derive(Error, Debug)]
pub enum ServerError {
    #[error("Invalid listen address {addr}: {reason}")]
    InvalidAddress { addr: String, reason: String },

    #[error("Failed to bind {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: std::io::Error,
    },

    #[error("No services registered")]
    NoServices,

    #[error("Service prefix {prefix} is outside base path {base_path}")]
    PrefixOutsideBase { prefix: String, base_path: String },

    #[error("Service prefix {0} registered twice")]
    DuplicatePrefix(String),

    #[error("Server error: {0}")]
    Serve(#[from] std::io::Error),

    #[error("Server task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}
