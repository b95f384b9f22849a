//! SDK Error Helpers
//!
//! Every client-side failure is a [`WebrpcError`]; these helpers map
//! transport and decoding failures onto the protocol-reserved kinds.

use webrpc_core::{CodecError, WebrpcError};

/// SDK Result type
pub type Result<T> = std::result::Result<T, WebrpcError>;

/// The request never produced an HTTP response.
pub(crate) fn request_failed(stage: &str, err: &reqwest::Error) -> WebrpcError {
    WebrpcError::request_failed().with_cause(format!("{}(): {}", stage, err))
}

/// Arguments could not be put on the wire.
pub(crate) fn bad_request(err: &CodecError) -> WebrpcError {
    WebrpcError::bad_request().with_cause(format!("encode args: {}", err))
}

/// A 2xx response whose body is not what the method returns.
pub(crate) fn bad_response(status: u16, what: impl std::fmt::Display, text: &str) -> WebrpcError {
    WebrpcError::bad_response()
        .with_status(status)
        .with_cause(format!("{}: response text: {}", what, text))
}
