//! Error channel: named-event publish/subscribe for promiser failures.
//!
//! Every failed invocation is emitted once under [`ERROR_EVENT`] with the
//! error and the original request/response pair, independently of how the
//! response itself is written.
//!
//! ```ignore
//! let qed = Qed::new();
//! qed.on_error(|event| {
//!     tracing::error!(error = %event.error, path = ?event.req.resolve(&["path".into()]), "request failed");
//! });
//! ```

#[cfg(feature = "emitter")]
mod emitter;

#[cfg(feature = "emitter")]
pub use emitter::ErrorReport;

use std::collections::HashMap;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock};

use crate::binder::Resolve;
use crate::normalizer::HandlerError;

/// Event name used for promiser failures.
pub const ERROR_EVENT: &str = "error";

/// Payload delivered to error listeners.
pub struct ErrorEvent<'a> {
    pub error: &'a HandlerError,
    pub req: &'a dyn Resolve,
    pub res: &'a dyn Resolve,
}

/// Handle returned on subscription, used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

type Listener = Arc<dyn Fn(&ErrorEvent<'_>) + Send + Sync>;

struct Registration {
    id: ListenerId,
    once: bool,
    listener: Listener,
}

/// Cloneable handle to a shared listener registry.
///
/// Listeners run synchronously on the emitting task, outside the registry
/// lock, so they may subscribe, unsubscribe or emit from inside a callback.
#[derive(Clone, Default)]
pub struct ErrorChannel {
    listeners: Arc<RwLock<HashMap<String, Vec<Registration>>>>,
    next_id: Arc<AtomicU64>,
}

impl ErrorChannel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a listener for `event`.
    pub fn on<F>(&self, event: &str, listener: F) -> ListenerId
    where
        F: Fn(&ErrorEvent<'_>) + Send + Sync + 'static,
    {
        self.register(event, false, Arc::new(listener))
    }

    /// Register a listener that is removed after its first call.
    pub fn once<F>(&self, event: &str, listener: F) -> ListenerId
    where
        F: Fn(&ErrorEvent<'_>) + Send + Sync + 'static,
    {
        self.register(event, true, Arc::new(listener))
    }

    /// Shorthand for `on(ERROR_EVENT, listener)`.
    pub fn on_error<F>(&self, listener: F) -> ListenerId
    where
        F: Fn(&ErrorEvent<'_>) + Send + Sync + 'static,
    {
        self.on(ERROR_EVENT, listener)
    }

    /// Remove one listener. Returns `false` if it was already gone.
    pub fn remove_listener(&self, id: ListenerId) -> bool {
        let mut listeners = self.listeners.write().unwrap_or_else(PoisonError::into_inner);
        let mut removed = false;
        for registrations in listeners.values_mut() {
            let before = registrations.len();
            registrations.retain(|r| r.id != id);
            removed |= registrations.len() != before;
        }
        listeners.retain(|_, registrations| !registrations.is_empty());
        removed
    }

    /// Drop every listener on every event.
    pub fn remove_all_listeners(&self) {
        self.listeners
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }

    pub fn listener_count(&self, event: &str) -> usize {
        self.listeners
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(event)
            .map_or(0, Vec::len)
    }

    /// Deliver `payload` to every listener of `event`. Returns how many ran.
    ///
    /// Never panics: a listener that panics is logged and skipped.
    pub fn emit(&self, event: &str, payload: &ErrorEvent<'_>) -> usize {
        let snapshot = self.take_snapshot(event);

        for (id, listener) in &snapshot {
            if panic::catch_unwind(AssertUnwindSafe(|| listener(payload))).is_err() {
                tracing::warn!(event, listener = id.0, "error listener panicked");
            }
        }

        snapshot.len()
    }

    fn register(&self, event: &str, once: bool, listener: Listener) -> ListenerId {
        let id = ListenerId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.listeners
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(event.to_string())
            .or_default()
            .push(Registration { id, once, listener });
        id
    }

    /// Copy out the current listeners, dropping `once` registrations before
    /// they run so a re-entrant emit cannot fire them twice.
    fn take_snapshot(&self, event: &str) -> Vec<(ListenerId, Listener)> {
        let mut listeners = self.listeners.write().unwrap_or_else(PoisonError::into_inner);
        let Some(registrations) = listeners.get_mut(event) else {
            return Vec::new();
        };

        let snapshot = registrations
            .iter()
            .map(|r| (r.id, Arc::clone(&r.listener)))
            .collect();
        registrations.retain(|r| !r.once);
        if registrations.is_empty() {
            listeners.remove(event);
        }
        snapshot
    }
}
