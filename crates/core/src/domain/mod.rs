// Domain Layer - static service/error descriptions and per-call values

pub mod error_kind;
pub mod request;
pub mod shape;

pub use error_kind::{ErrorKind, ErrorTable, ProtocolError, TableError, PROTOCOL_KINDS};
pub use request::{Headers, RpcRequest, RpcResult, APPLICATION_JSON, CONTENT_TYPE, WEBRPC_HEADER};
pub use shape::{Field, MethodDef, SchemaHeader, ServiceDefinition, Shape, EMPTY};
