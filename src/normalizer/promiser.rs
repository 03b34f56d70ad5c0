use std::future::Future;

use futures::future::{self, BoxFuture, FutureExt};
use serde::Serialize;
use serde_json::Value;

use super::error::HandlerError;
use crate::binder::Args;

/// Business logic adapted by a [`Handler`](crate::Handler).
///
/// Implemented for every `Fn(Args) -> impl Future<Output = Result<T, E>>`
/// where `T: Serialize` and `E: Into<HandlerError>`. Wrap synchronous
/// closures with [`immediate`].
pub trait Promiser: Send + Sync + 'static {
    fn call(&self, args: Args) -> BoxFuture<'static, Result<Value, HandlerError>>;
}

impl<F, Fut, T, E> Promiser for F
where
    F: Fn(Args) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<T, E>> + Send + 'static,
    T: Serialize + Send + 'static,
    E: Into<HandlerError> + Send + 'static,
{
    fn call(&self, args: Args) -> BoxFuture<'static, Result<Value, HandlerError>> {
        self(args).map(encode).boxed()
    }
}

/// A synchronous promiser. See [`immediate`].
pub struct Immediate<F>(F);

/// Adapt a synchronous closure. Its return value is still delivered as a
/// settled future, so it is dispatched exactly like an async one.
///
/// ```ignore
/// let handler = qed.create(immediate(|args: Args| args.get::<i64>(0).map(|n| n * 2)), ["req.n"])?;
/// ```
pub fn immediate<F, T, E>(f: F) -> Immediate<F>
where
    F: Fn(Args) -> Result<T, E> + Send + Sync + 'static,
    T: Serialize,
    E: Into<HandlerError>,
{
    Immediate(f)
}

impl<F, T, E> Promiser for Immediate<F>
where
    F: Fn(Args) -> Result<T, E> + Send + Sync + 'static,
    T: Serialize,
    E: Into<HandlerError>,
{
    fn call(&self, args: Args) -> BoxFuture<'static, Result<Value, HandlerError>> {
        future::ready(encode((self.0)(args))).boxed()
    }
}

fn encode<T: Serialize, E: Into<HandlerError>>(result: Result<T, E>) -> Result<Value, HandlerError> {
    let value = result.map_err(Into::into)?;
    serde_json::to_value(value).map_err(|e| HandlerError::EncodeFailed(e.to_string()))
}
