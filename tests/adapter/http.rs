//! HTTP integration tests.
//!
//! Starts an axum server and exercises it with reqwest.

use axum::Router;
use qed_rust::http::{endpoint, HttpRequest, HttpResponse};
use qed_rust::{Args, Handler, HandlerError, Qed};
use serde_json::json;

fn sum_handler(qed: &Qed) -> Handler<HttpRequest, HttpResponse> {
    let handler = qed
        .create(
            |args: Args| async move {
                let a: i64 = args.get(0)?;
                let b: i64 = args.get(1)?;
                if a + b > 100 {
                    return Err(HandlerError::Rejected("too big".into()));
                }
                Ok(json!({ "sum": a + b, "caller": args.get_opt::<String>(2)? }))
            },
            ["req.body.a", "req.body.b", "req.headers.x-user-id"],
        )
        .unwrap();
    handler.status_code(201).unwrap();
    handler
}

/// Bind to port 0 and return the actual address.
async fn start_server(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

#[tokio::test]
async fn success_uses_configured_status() {
    let qed = Qed::new();
    let app = Router::new().route("/sum", endpoint(sum_handler(&qed)));
    let base = start_server(app).await;

    let resp = reqwest::Client::new()
        .post(format!("{base}/sum"))
        .header("x-user-id", "user-42")
        .json(&json!({ "a": 2, "b": 3 }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 201);

    let body: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(body, json!({ "sum": 5, "caller": "user-42" }));
}

#[tokio::test]
async fn failures_map_to_error_codes() {
    let qed = Qed::new();
    let app = Router::new().route("/sum", endpoint(sum_handler(&qed)));
    let base = start_server(app).await;
    let client = reqwest::Client::new();

    let resp = client
        .post(format!("{base}/sum"))
        .json(&json!({ "a": 99, "b": 3 }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 422);
    let body: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(body, json!("rejected: too big"));

    let resp = client
        .post(format!("{base}/sum"))
        .json(&json!({ "a": 1 }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);
}

#[tokio::test]
async fn failures_reach_the_error_channel() {
    let qed = Qed::new();
    let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
    qed.on_error(move |event| {
        let _ = tx.send(event.error.message());
    });

    let app = Router::new().route("/sum", endpoint(sum_handler(&qed)));
    let base = start_server(app).await;

    reqwest::Client::new()
        .post(format!("{base}/sum"))
        .json(&json!({ "a": 60, "b": 60 }))
        .send()
        .await
        .unwrap();

    assert_eq!(rx.recv().await.unwrap(), "rejected: too big");
}

#[tokio::test]
async fn custom_strategy_that_never_sends_is_a_500() {
    let qed = Qed::new();
    let handler = sum_handler(&qed);
    handler.respond_with(|_, _| {});
    let app = Router::new().route("/sum", endpoint(handler));
    let base = start_server(app).await;

    let resp = reqwest::Client::new()
        .post(format!("{base}/sum"))
        .json(&json!({ "a": 1, "b": 1 }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 500);
}
