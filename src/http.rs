//! axum integration: run a [`Handler`] as an axum endpoint.
//!
//! Requires the `http` feature.
//!
//! ## Request view
//!
//! Accessor paths resolve against:
//!
//! ```json
//! {
//!   "method": "POST",
//!   "path": "/orders",
//!   "query": { "verbose": "true" },
//!   "headers": { "x-request-id": "abc" },
//!   "body": { "product_id": "SKU-1" }
//! }
//! ```
//!
//! ## Example
//!
//! ```ignore
//! let create_order = qed.create(
//!     |args: Args| async move { orders::create(args.get(0)?, args.get(1)?).await },
//!     ["req.body.product_id", "req.headers.x-user-id"],
//! )?;
//! create_order.status_code(201)?;
//!
//! let app = axum::Router::new().route("/orders", qed_rust::http::endpoint(create_order));
//! ```

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use axum::body::Bytes;
use axum::extract::Query;
use axum::http::{HeaderMap, Method, StatusCode, Uri};
use axum::response::{IntoResponse, Response as AxumResponse};
use axum::routing::{any, MethodRouter};
use axum::Json;
use serde_json::{json, Map, Value};

use crate::binder::{lookup, Resolve};
use crate::dispatcher::Response;
use crate::handler::Handler;

/// Read-only view of an incoming HTTP request.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpRequest {
    view: Value,
}

impl HttpRequest {
    pub fn new(method: &Method, uri: &Uri, headers: &HeaderMap, body: &[u8]) -> Self {
        let query = Query::<HashMap<String, String>>::try_from_uri(uri)
            .map(|Query(query)| query)
            .unwrap_or_default();

        Self {
            view: json!({
                "method": method.as_str(),
                "path": uri.path(),
                "query": query,
                "headers": header_map(headers),
                "body": parse_body(body),
            }),
        }
    }

    /// The whole request as JSON.
    pub fn view(&self) -> &Value {
        &self.view
    }
}

impl Resolve for HttpRequest {
    fn resolve(&self, path: &[String]) -> Option<Value> {
        lookup(&self.view, path).cloned()
    }
}

/// Header names are lowercase; values that are not valid UTF-8 are skipped.
fn header_map(headers: &HeaderMap) -> Map<String, Value> {
    headers
        .iter()
        .filter_map(|(name, value)| {
            value
                .to_str()
                .ok()
                .map(|v| (name.as_str().to_string(), Value::String(v.to_string())))
        })
        .collect()
}

/// JSON if it parses, the raw text otherwise, `null` when empty.
fn parse_body(body: &[u8]) -> Value {
    if body.is_empty() {
        return Value::Null;
    }
    serde_json::from_slice(body)
        .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(body).into_owned()))
}

/// Response handle that records a single `(status, body)`.
///
/// Clones share the same slot. Once something is sent the response
/// reports itself as no longer writable and later sends are ignored.
#[derive(Debug, Clone, Default)]
pub struct HttpResponse {
    sent: Arc<Mutex<Option<(u16, Value)>>>,
}

impl HttpResponse {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take the recorded status and body, if any.
    pub fn take(&self) -> Option<(u16, Value)> {
        self.sent.lock().unwrap_or_else(PoisonError::into_inner).take()
    }

    fn is_sent(&self) -> bool {
        self.sent
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }
}

impl Resolve for HttpResponse {
    fn resolve(&self, path: &[String]) -> Option<Value> {
        let view = json!({ "sent": self.is_sent() });
        lookup(&view, path).cloned()
    }
}

impl Response for HttpResponse {
    fn writable(&self) -> Option<bool> {
        Some(!self.is_sent())
    }

    fn send(&self, status: u16, body: Value) {
        let mut sent = self.sent.lock().unwrap_or_else(PoisonError::into_inner);
        if sent.is_some() {
            tracing::warn!(status, "response already sent; ignoring");
            return;
        }
        *sent = Some((status, body));
    }
}

/// Build an axum route that runs `handler` for any method.
pub fn endpoint<S>(handler: Handler<HttpRequest, HttpResponse>) -> MethodRouter<S>
where
    S: Clone + Send + Sync + 'static,
{
    any(
        move |method: Method, uri: Uri, headers: HeaderMap, body: Bytes| {
            let handler = handler.clone();
            async move {
                let req = HttpRequest::new(&method, &uri, &headers, &body);
                serve(&handler, req).await
            }
        },
    )
}

/// Run `handler` for one request and convert what it sent into an axum response.
pub async fn serve(handler: &Handler<HttpRequest, HttpResponse>, req: HttpRequest) -> AxumResponse {
    let res = HttpResponse::new();
    match handler.call(req, res.clone()) {
        Ok(pending) => pending.await,
        Err(e) => {
            let body = json!({ "error": e.to_string() });
            return (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response();
        }
    }

    match res.take() {
        Some((status, body)) => {
            let status = StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
            (status, Json(body)).into_response()
        }
        None => {
            tracing::warn!("handler settled without sending a response");
            let body = json!({ "error": "handler produced no response" });
            (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
        }
    }
}
