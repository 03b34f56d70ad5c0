//! qed_rust: adapt promise-returning business functions into `(req, res)` handlers.
//!
//! Application code is written as plain (async) functions of extracted
//! inputs. The adapter binds those inputs from the request/response pair,
//! normalises whatever the function returns, writes an HTTP-shaped response
//! and reports failures on a shared error channel.
//!
//! ## Quick Start
//!
//! ```ignore
//! use qed_rust::{Args, HandlerError, Qed};
//!
//! let qed = Qed::new();
//! qed.on_error(|event| tracing::error!(error = %event.error, "request failed"));
//!
//! let handler = qed.create(
//!     |args: Args| async move {
//!         let a: i64 = args.get(0)?;
//!         let b: i64 = args.get(1)?;
//!         Ok::<_, HandlerError>(a + b)
//!     },
//!     ["req.query.a", "req.query.b"],
//! )?;
//! handler.status_code(200)?;
//!
//! // In the framework: run it for each (req, res) pair.
//! handler.call(req, res)?.await;
//! ```
//!
//! ## Pieces
//!
//! - [`binder`]: accessor specs (`"req.<path>"`, `"res.<path>"`) and the
//!   [`Resolve`] trait request/response objects implement.
//! - [`normalizer`]: the [`Promiser`] trait; sync, async and panicking
//!   promisers all settle into `Result<Value, HandlerError>`.
//! - [`dispatcher`]: the [`Response`] trait and [`ResponseConfig`]
//!   (default status or custom strategy).
//! - [`channel`]: the [`ErrorChannel`] every failure is emitted on.
//! - `http` (feature `http`): axum request/response types and `endpoint`.

pub mod binder;
pub mod channel;
pub mod dispatcher;
mod error;
mod factory;
mod handler;
pub mod normalizer;

#[cfg(feature = "http")]
pub mod http;

pub use binder::{lookup, Accessor, Args, Binding, Resolve, Side};
pub use channel::{ErrorChannel, ErrorEvent, ListenerId, ERROR_EVENT};
pub use dispatcher::{CustomStrategy, Response, ResponseConfig};
pub use error::{ConfigError, InvocationError};
pub use factory::{create, create_whole, Qed};
pub use handler::{Handler, HandlerConfig};
pub use normalizer::{immediate, HandlerError, Immediate, Promiser};

#[cfg(feature = "emitter")]
pub use channel::ErrorReport;

// Re-export the EventEmitter from the event_emitter_rs crate
#[cfg(feature = "emitter")]
pub use event_emitter_rs::EventEmitter;
