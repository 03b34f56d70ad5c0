//! The `(req, res)` handler produced by [`Qed`](crate::Qed).

use std::fmt;
use std::marker::PhantomData;
use std::sync::{Arc, PoisonError, RwLock};

use futures::future::{BoxFuture, FutureExt};
use serde_json::Value;

use crate::binder::{Binder, Binding, Resolve};
use crate::channel::ErrorChannel;
use crate::dispatcher::{self, CustomStrategy, Response, ResponseConfig, ResponseSettings};
use crate::error::{ConfigError, InvocationError};
use crate::normalizer::{self, HandlerError, Promiser};

/// A promiser adapted to the `(req, res)` calling convention.
///
/// Cheap to clone; clones share the promiser, the binding and the response
/// configuration.
///
/// ```ignore
/// let handler = qed.create(|args: Args| async move { find_user(args.get(0)?).await }, ["req.params.id"])?;
/// handler.status_code(200)?;
///
/// // framework side
/// handler.call(req, res)?.await;
/// ```
pub struct Handler<Req, Res> {
    inner: Arc<Inner<Req, Res>>,
}

struct Inner<Req, Res> {
    promiser: Arc<dyn Promiser>,
    binder: Binder,
    settings: RwLock<ResponseSettings<Res>>,
    channel: ErrorChannel,
    _req: PhantomData<fn(Req)>,
}

/// Snapshot of a handler's response configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HandlerConfig {
    /// Configured success status, `None` meaning the default 200.
    pub status: Option<u16>,
    /// Whether a custom strategy is installed. It takes precedence over `status`.
    pub custom: bool,
}

impl<Req, Res> Handler<Req, Res>
where
    Req: Resolve + Send + Sync + 'static,
    Res: Response,
{
    pub(crate) fn new<P: Promiser>(promiser: P, binding: Binding, channel: ErrorChannel) -> Self {
        let binder = Binder::new(binding);
        tracing::debug!(arity = binder.arity(), "handler created");
        Self {
            inner: Arc::new(Inner {
                promiser: Arc::new(promiser),
                binder,
                settings: RwLock::new(ResponseSettings::default()),
                channel,
                _req: PhantomData,
            }),
        }
    }

    /// Invoke the handler.
    ///
    /// Fails synchronously if `req` or `res` is absent. Otherwise binds the
    /// arguments, calls the promiser once, and returns a future that writes
    /// the response when the promiser settles. The future never fails.
    pub fn call(&self, req: Req, res: Res) -> Result<BoxFuture<'static, ()>, InvocationError> {
        if req.is_absent() || res.is_absent() {
            return Err(InvocationError::MissingRequestOrResponse);
        }

        let args = self.inner.binder.bind(&req, &res);
        let settled = normalizer::normalize(self.inner.promiser.as_ref(), args);
        let settings = self.settings();
        let inner = Arc::clone(&self.inner);

        Ok(async move {
            let outcome = settled.await;
            dispatcher::dispatch(&inner.channel, settings, &req, &res, outcome);
        }
        .boxed())
    }

    /// Apply a response configuration. Returns the handler for chaining.
    pub fn response(&self, config: ResponseConfig<Res>) -> Result<&Self, ConfigError> {
        self.inner
            .settings
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .apply(config)?;
        Ok(self)
    }

    /// Answer successes with `code` (must be in `200..=599`).
    pub fn status_code(&self, code: u16) -> Result<&Self, ConfigError> {
        self.response(ResponseConfig::Status(code))
    }

    /// Replace the default response logic with `strategy`.
    pub fn respond_with<F>(&self, strategy: F) -> &Self
    where
        F: Fn(&Res, Result<Value, HandlerError>) + Send + Sync + 'static,
    {
        let strategy: CustomStrategy<Res> = Arc::new(strategy);
        self.inner
            .settings
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .custom = Some(strategy);
        self
    }

    pub fn config(&self) -> HandlerConfig {
        let settings = self.settings();
        HandlerConfig {
            status: settings.status,
            custom: settings.custom.is_some(),
        }
    }

    /// Number of arguments the promiser receives.
    pub fn arity(&self) -> usize {
        self.inner.binder.arity()
    }

    fn settings(&self) -> ResponseSettings<Res> {
        self.inner
            .settings
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl<Req, Res> Clone for Handler<Req, Res> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<Req, Res> fmt::Debug for Handler<Req, Res> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Handler")
            .field("binder", &self.inner.binder)
            .finish_non_exhaustive()
    }
}
