// webrpc Core - Dispatcher, Codec & Error Taxonomy
// NO HTTP dependencies: hosts and client transports plug in from outside.

pub mod application;
pub mod domain;
pub mod error;
pub mod port;

pub use application::codec;
pub use application::{BuildError, CodecError, Service, ServiceBuilder};
pub use domain::{
    ErrorKind, ErrorTable, Field, MethodDef, ProtocolError, RpcRequest, RpcResult,
    ServiceDefinition, Shape,
};
pub use error::{ErrorClass, ErrorPayload, Result, WebrpcError};
pub use port::{HandlerFuture, RequestContext};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
