//! The adapter factory.

use std::sync::OnceLock;

use crate::binder::{Binding, Resolve};
use crate::channel::{ErrorChannel, ErrorEvent, ListenerId};
use crate::dispatcher::Response;
use crate::error::ConfigError;
use crate::handler::Handler;
use crate::normalizer::Promiser;

static GLOBAL: OnceLock<Qed> = OnceLock::new();

/// Creates [`Handler`]s and owns the error channel they report to.
///
/// Use [`Qed::global`] for the process-wide instance, or [`Qed::new`] for an
/// isolated one (tests, embedding several apps in one process).
#[derive(Clone, Default)]
pub struct Qed {
    channel: ErrorChannel,
}

impl Qed {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_channel(channel: ErrorChannel) -> Self {
        Self { channel }
    }

    /// The process-wide factory.
    pub fn global() -> &'static Qed {
        GLOBAL.get_or_init(Qed::new)
    }

    pub fn channel(&self) -> &ErrorChannel {
        &self.channel
    }

    /// Adapt `promiser`, binding one argument per accessor spec.
    ///
    /// Each spec must start with `req.` or `res.`; the first one that does
    /// not is returned in the error. No specs means no arguments.
    pub fn create<Req, Res, P, I, S>(
        &self,
        promiser: P,
        specs: I,
    ) -> Result<Handler<Req, Res>, ConfigError>
    where
        Req: Resolve + Send + Sync + 'static,
        Res: Response,
        P: Promiser,
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let binding = Binding::paths(specs)?;
        Ok(self.create_with(promiser, binding))
    }

    /// Adapt `promiser`, passing it the whole request and the whole response.
    pub fn create_whole<Req, Res, P>(&self, promiser: P) -> Handler<Req, Res>
    where
        Req: Resolve + Send + Sync + 'static,
        Res: Response,
        P: Promiser,
    {
        self.create_with(promiser, Binding::Whole)
    }

    pub fn create_with<Req, Res, P>(&self, promiser: P, binding: Binding) -> Handler<Req, Res>
    where
        Req: Resolve + Send + Sync + 'static,
        Res: Response,
        P: Promiser,
    {
        Handler::new(promiser, binding, self.channel.clone())
    }

    pub fn on<F>(&self, event: &str, listener: F) -> ListenerId
    where
        F: Fn(&ErrorEvent<'_>) + Send + Sync + 'static,
    {
        self.channel.on(event, listener)
    }

    pub fn once<F>(&self, event: &str, listener: F) -> ListenerId
    where
        F: Fn(&ErrorEvent<'_>) + Send + Sync + 'static,
    {
        self.channel.once(event, listener)
    }

    pub fn on_error<F>(&self, listener: F) -> ListenerId
    where
        F: Fn(&ErrorEvent<'_>) + Send + Sync + 'static,
    {
        self.channel.on_error(listener)
    }

    pub fn remove_listener(&self, id: ListenerId) -> bool {
        self.channel.remove_listener(id)
    }

    pub fn remove_all_listeners(&self) {
        self.channel.remove_all_listeners()
    }

    pub fn listener_count(&self, event: &str) -> usize {
        self.channel.listener_count(event)
    }
}

/// [`Qed::create`] on the global factory.
pub fn create<Req, Res, P, I, S>(promiser: P, specs: I) -> Result<Handler<Req, Res>, ConfigError>
where
    Req: Resolve + Send + Sync + 'static,
    Res: Response,
    P: Promiser,
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    Qed::global().create(promiser, specs)
}

/// [`Qed::create_whole`] on the global factory.
pub fn create_whole<Req, Res, P>(promiser: P) -> Handler<Req, Res>
where
    Req: Resolve + Send + Sync + 'static,
    Res: Response,
    P: Promiser,
{
    Qed::global().create_whole(promiser)
}
