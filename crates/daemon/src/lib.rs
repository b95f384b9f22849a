//! Example webrpc server
//!
//! The binary wires [`service::ExampleService`] into the HTTP host; the
//! pieces are exposed here so tests can reuse them.

pub mod service;
pub mod telemetry;

pub use service::ExampleService;
