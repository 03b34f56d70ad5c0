//! Result normalisation: every promiser outcome becomes one settled future.
//!
//! Sync returns, async returns and panics all end up as
//! `Result<Value, HandlerError>`. Nothing the promiser does unwinds past
//! [`normalize`].

mod error;
mod promiser;

pub use error::HandlerError;
pub use promiser::{immediate, Immediate, Promiser};

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};

use futures::future::{self, BoxFuture, FutureExt};
use serde_json::Value;

use crate::binder::Args;

/// Invoke `promiser` exactly once and normalise its outcome.
pub(crate) fn normalize(
    promiser: &dyn Promiser,
    args: Args,
) -> BoxFuture<'static, Result<Value, HandlerError>> {
    let deferred = match panic::catch_unwind(AssertUnwindSafe(|| promiser.call(args))) {
        Ok(deferred) => deferred,
        Err(payload) => return future::ready(Err(panicked(payload))).boxed(),
    };

    AssertUnwindSafe(deferred)
        .catch_unwind()
        .map(|settled| settled.unwrap_or_else(|payload| Err(panicked(payload))))
        .boxed()
}

fn panicked(payload: Box<dyn Any + Send>) -> HandlerError {
    let message = if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    };
    HandlerError::Panicked(message)
}
