//! Bridge from the error channel to an `event_emitter_rs::EventEmitter`.

use std::sync::{Arc, Mutex};

use event_emitter_rs::EventEmitter;
use serde::{Deserialize, Serialize};

use super::{ErrorChannel, ListenerId, ERROR_EVENT};
use crate::dispatcher::FALLBACK_ERROR_STATUS;
use crate::normalizer::HandlerError;

/// Owned, serializable summary of a failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorReport {
    /// Status the default strategy answers with.
    pub code: u16,
    pub message: String,
}

impl From<&HandlerError> for ErrorReport {
    fn from(error: &HandlerError) -> Self {
        Self {
            code: error.code().unwrap_or(FALLBACK_ERROR_STATUS),
            message: error.message(),
        }
    }
}

impl ErrorChannel {
    /// Republish every failure as an [`ErrorReport`] on `emitter`'s `"error"` event.
    ///
    /// The emitter delivers on its own threads, so subscribers there only
    /// see the owned report, not the request/response pair.
    pub fn forward_to(&self, emitter: Arc<Mutex<EventEmitter>>) -> ListenerId {
        self.on_error(move |event| {
            let report = ErrorReport::from(event.error);
            match emitter.lock() {
                Ok(mut emitter) => {
                    emitter.emit(ERROR_EVENT, report);
                }
                Err(_) => tracing::warn!("event emitter lock poisoned; dropping error report"),
            }
        })
    }
}
