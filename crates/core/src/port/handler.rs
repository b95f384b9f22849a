// Handler Port - the seam between the dispatcher and service code

use futures::future::BoxFuture;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::marker::PhantomData;

/// Future returned by a typed handler; borrows the request context.
pub type HandlerFuture<'a, R> = BoxFuture<'a, anyhow::Result<R>>;

/// Why an erased method call did not produce a value
#[derive(Debug)]
pub enum MethodError {
    /// Decoded arguments did not fit the handler's argument type
    InvalidArgs(serde_json::Error),
    /// The handler itself failed
    Failed(anyhow::Error),
    /// The handler's return value could not be serialized
    InvalidReturn(serde_json::Error),
}

/// Type-erased method handler.
///
/// Arguments arrive already decoded by the codec (native JSON); the
/// returned value is native JSON, encoded by the dispatcher afterwards.
pub trait Method<C>: Send + Sync {
    fn call<'a>(&'a self, ctx: &'a C, args: Value) -> BoxFuture<'a, Result<Value, MethodError>>;
}

/// Adapts a typed async function to [`Method`].
pub struct TypedMethod<F, A, R> {
    handler: F,
    _types: PhantomData<fn(A) -> R>,
}

impl<F, A, R> TypedMethod<F, A, R> {
    pub fn new<C>(handler: F) -> Self
    where
        F: for<'a> Fn(&'a C, A) -> HandlerFuture<'a, R>,
    {
        Self {
            handler,
            _types: PhantomData,
        }
    }
}

impl<C, F, A, R> Method<C> for TypedMethod<F, A, R>
where
    C: Send + Sync + 'static,
    F: for<'a> Fn(&'a C, A) -> HandlerFuture<'a, R> + Send + Sync,
    A: DeserializeOwned + Send + 'static,
    R: Serialize + Send + 'static,
{
    fn call<'a>(&'a self, ctx: &'a C, args: Value) -> BoxFuture<'a, Result<Value, MethodError>> {
        let args: A = match serde_json::from_value(args) {
            Ok(args) => args,
            Err(e) => return Box::pin(async move { Err(MethodError::InvalidArgs(e)) }),
        };

        let fut = (self.handler)(ctx, args);
        Box::pin(async move {
            let ret = fut.await.map_err(MethodError::Failed)?;
            serde_json::to_value(ret).map_err(MethodError::InvalidReturn)
        })
    }
}
