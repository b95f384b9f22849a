// Port Layer - what service code and host adapters plug into

pub mod context;
pub mod handler;

// Re-exports
pub use context::{cancel_channel, CancelOnDrop, CancelSignal, CancelTrigger, RequestContext};
pub use handler::{HandlerFuture, Method, MethodError, TypedMethod};
