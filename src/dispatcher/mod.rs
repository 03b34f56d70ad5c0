//! Response dispatch: writes a settled outcome to the response object.
//!
//! A failure is always emitted on the error channel first; the response is
//! then written by either the default strategy or a custom one. A panic in
//! either step is contained so the other still happens.

mod config;

pub use config::{CustomStrategy, ResponseConfig, DEFAULT_STATUS, FALLBACK_ERROR_STATUS};
pub(crate) use config::ResponseSettings;

use std::panic::{self, AssertUnwindSafe};

use serde_json::Value;

use crate::binder::Resolve;
use crate::channel::{ErrorChannel, ErrorEvent, ERROR_EVENT};
use crate::normalizer::HandlerError;

/// The response side of a `(req, res)` pair.
///
/// Methods take `&self`: responses are usually handles onto a connection,
/// so implementations use interior mutability.
pub trait Response: Resolve + Send + Sync + 'static {
    /// `Some(false)` once the underlying stream can no longer be written.
    /// `None` means the response has no writability signal.
    fn writable(&self) -> Option<bool> {
        None
    }

    /// Write a status and body.
    fn send(&self, status: u16, body: Value);

    /// Report a failure through the response's own error capability.
    ///
    /// Returns `false` when there is no such capability, in which case the
    /// failure is sent as `(code or 500, message)`.
    fn error(&self, _error: &HandlerError) -> bool {
        false
    }
}

pub(crate) fn dispatch<Req, Res>(
    channel: &ErrorChannel,
    settings: ResponseSettings<Res>,
    req: &Req,
    res: &Res,
    outcome: Result<Value, HandlerError>,
) where
    Req: Resolve,
    Res: Response,
{
    if let Err(error) = &outcome {
        tracing::error!(error = %error, "promiser failed");
        channel.emit(
            ERROR_EVENT,
            &ErrorEvent { error, req, res },
        );
    }

    let written = panic::catch_unwind(AssertUnwindSafe(|| match settings.custom {
        Some(strategy) => strategy(res, outcome),
        None => respond(settings.success_status(), res, outcome),
    }));
    if written.is_err() {
        tracing::error!("response strategy panicked");
    }
}

fn respond<Res: Response>(status: u16, res: &Res, outcome: Result<Value, HandlerError>) {
    if res.writable() == Some(false) {
        tracing::debug!(failed = outcome.is_err(), "response no longer writable; dropping outcome");
        return;
    }
    match outcome {
        Ok(value) => {
            tracing::debug!(status, "sending result");
            res.send(status, value);
        }
        Err(error) => {
            if res.error(&error) {
                return;
            }
            let status = error.code().unwrap_or(FALLBACK_ERROR_STATUS);
            tracing::debug!(status, "sending failure");
            res.send(status, Value::String(error.message()));
        }
    }
}
