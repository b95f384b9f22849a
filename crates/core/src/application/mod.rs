// Application Layer - codec and dispatch

pub mod codec;
pub mod dispatcher;
pub mod panic_guard;

pub use codec::CodecError;
pub use dispatcher::{BuildError, Service, ServiceBuilder, DEFAULT_BASE_PATH};
