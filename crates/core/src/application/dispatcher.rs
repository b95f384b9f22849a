//! Service Dispatcher
//!
//! Resolves `<base>/<Service>/<Method>` paths against a static method table
//! and turns every outcome into an [`RpcResult`]. Handler failures never
//! escape: they come back as error payloads.

use crate::application::codec;
use crate::application::panic_guard::{execute_guarded, PanicGuardResult};
use crate::domain::{MethodDef, RpcRequest, RpcResult, ServiceDefinition};
use crate::error::{ErrorPayload, WebrpcError};
use crate::port::handler::{HandlerFuture, Method, MethodError, TypedMethod};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::HashMap;
use thiserror::Error;
use tracing::{debug, error, warn};

/// Path segment all services live under unless configured otherwise
pub const DEFAULT_BASE_PATH: &str = "/rpc";

/// Registration errors, reported once at startup
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BuildError {
    #[error("Service {service} does not define method {method}")]
    UnknownMethod {
        service: &'static str,
        method: String,
    },

    #[error("Method {service}.{method} registered twice")]
    DuplicateMethod {
        service: &'static str,
        method: &'static str,
    },

    #[error("Service {service} defines method {method} more than once")]
    DuplicateDefinition {
        service: &'static str,
        method: &'static str,
    },

    #[error("Method {service}.{method} has no handler")]
    MissingHandler {
        service: &'static str,
        method: &'static str,
    },
}

struct Registered<C> {
    def: &'static MethodDef,
    handler: Box<dyn Method<C>>,
}

/// Collects handlers for one [`ServiceDefinition`].
pub struct ServiceBuilder<C> {
    definition: &'static ServiceDefinition,
    base_path: String,
    methods: HashMap<&'static str, Registered<C>>,
    errors: Vec<BuildError>,
}

impl<C: Send + Sync + 'static> ServiceBuilder<C> {
    pub fn new(definition: &'static ServiceDefinition) -> Self {
        Self {
            definition,
            base_path: DEFAULT_BASE_PATH.to_string(),
            methods: HashMap::new(),
            errors: Vec::new(),
        }
    }

    /// Mount the service under a different base path (default `/rpc`).
    pub fn base_path(mut self, base_path: impl Into<String>) -> Self {
        self.base_path = base_path.into().trim_end_matches('/').to_string();
        self
    }

    /// Bind a typed handler to a method name.
    pub fn method<F, A, R>(self, name: &str, handler: F) -> Self
    where
        F: for<'a> Fn(&'a C, A) -> HandlerFuture<'a, R> + Send + Sync + 'static,
        A: DeserializeOwned + Send + 'static,
        R: Serialize + Send + 'static,
    {
        self.method_boxed(name, Box::new(TypedMethod::new(handler)))
    }

    /// Bind an already type-erased handler.
    pub fn method_boxed(mut self, name: &str, handler: Box<dyn Method<C>>) -> Self {
        let service = self.definition.name;
        match self.definition.method(name) {
            None => self.errors.push(BuildError::UnknownMethod {
                service,
                method: name.to_string(),
            }),
            Some(def) if self.methods.contains_key(def.name) => {
                self.errors.push(BuildError::DuplicateMethod {
                    service,
                    method: def.name,
                })
            }
            Some(def) => {
                self.methods.insert(def.name, Registered { def, handler });
            }
        }
        self
    }

    /// Check the handler set against the definition and freeze it.
    pub fn build(mut self) -> Result<Service<C>, BuildError> {
        let methods = self.definition.methods;
        if let Some((_, dup)) = methods
            .iter()
            .enumerate()
            .find(|(i, m)| methods[..*i].iter().any(|other| other.name == m.name))
        {
            return Err(BuildError::DuplicateDefinition {
                service: self.definition.name,
                method: dup.name,
            });
        }

        if !self.errors.is_empty() {
            return Err(self.errors.swap_remove(0));
        }

        if let Some(missing) = self
            .definition
            .methods
            .iter()
            .find(|m| !self.methods.contains_key(m.name))
        {
            return Err(BuildError::MissingHandler {
                service: self.definition.name,
                method: missing.name,
            });
        }

        Ok(Service {
            prefix: format!("{}/{}/", self.base_path, self.definition.name),
            header: self.definition.header_value(),
            definition: self.definition,
            methods: self.methods,
        })
    }
}

/// A service ready to dispatch; immutable and shareable across tasks.
pub struct Service<C> {
    definition: &'static ServiceDefinition,
    prefix: String,
    header: String,
    methods: HashMap<&'static str, Registered<C>>,
}

impl<C: Send + Sync + 'static> Service<C> {
    pub fn builder(definition: &'static ServiceDefinition) -> ServiceBuilder<C> {
        ServiceBuilder::new(definition)
    }

    pub fn definition(&self) -> &'static ServiceDefinition {
        self.definition
    }

    /// Path prefix this service answers to, e.g. `/rpc/Example/`
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Value of the protocol header sent with every response
    pub fn header_value(&self) -> &str {
        &self.header
    }

    /// Handle one call.
    ///
    /// Returns `None` when `url_path` is outside this service's prefix; the
    /// host should answer with its own "not found" in that case.
    pub async fn dispatch(&self, url_path: &str, raw_body: &[u8], ctx: &C) -> Option<RpcResult> {
        let request = RpcRequest::parse(&self.prefix, url_path, raw_body)?;
        Some(self.serve(&request, ctx).await)
    }

    /// Handle a request already matched against this service's prefix.
    pub async fn serve(&self, request: &RpcRequest, ctx: &C) -> RpcResult {
        let method_name = request.method_name();
        let Some(entry) = self.methods.get(method_name) else {
            debug!(service = self.definition.name, method = method_name, "Unknown method");
            return self.error_result(
                WebrpcError::bad_route()
                    .with_status(404)
                    .with_cause(format!("no handler for path: {}{}", self.prefix, method_name)),
            );
        };

        let args = match codec::parse_body(request.raw_body())
            .and_then(|wire| codec::decode(&wire, &entry.def.args))
        {
            Ok(args) => args,
            Err(e) => return self.bad_request(e.to_string()),
        };

        match execute_guarded(async { entry.handler.call(ctx, args).await }).await {
            PanicGuardResult::Completed(Ok(value)) => match codec::encode(&value, &entry.def.returns)
            {
                Ok(body) => RpcResult::json(200, &self.header, body),
                Err(e) => self.bad_response(method_name, e.to_string()),
            },
            PanicGuardResult::Completed(Err(MethodError::InvalidArgs(e))) => {
                self.bad_request(e.to_string())
            }
            PanicGuardResult::Completed(Err(MethodError::InvalidReturn(e))) => {
                self.bad_response(method_name, e.to_string())
            }
            PanicGuardResult::Completed(Err(MethodError::Failed(failure))) => {
                let err = WebrpcError::from_failure(&failure);
                if err.protocol_kind().is_some() {
                    warn!(method = method_name, error = %err, "RPC call failed");
                } else {
                    debug!(method = method_name, code = err.code, "RPC call returned error");
                }
                self.error_result(err)
            }
            PanicGuardResult::Panicked(msg) => {
                error!(method = method_name, panic_msg = %msg, "RPC handler panicked");
                self.error_result(WebrpcError::server_panic().with_cause(msg))
            }
        }
    }

    fn bad_request(&self, cause: String) -> RpcResult {
        self.error_result(WebrpcError::bad_request().with_status(400).with_cause(cause))
    }

    fn bad_response(&self, method_name: &str, cause: String) -> RpcResult {
        error!(method = method_name, cause = %cause, "Failed to encode handler result");
        self.error_result(WebrpcError::bad_response().with_status(500).with_cause(cause))
    }

    /// Build the result for an error; the payload's status matches the
    /// HTTP status actually sent.
    pub fn error_result(&self, err: WebrpcError) -> RpcResult {
        let status = err.http_status();
        let payload = ErrorPayload::from(err.with_status(status));
        RpcResult::json(status, &self.header, payload.to_json())
    }
}
