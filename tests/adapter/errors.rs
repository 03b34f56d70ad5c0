//! Error channel emission and the invocation guard.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use qed_rust::{
    immediate, Args, Binding, ErrorChannel, Handler, HandlerError, InvocationError, Qed,
    Resolve, ERROR_EVENT,
};
use serde_json::{json, Value};

use crate::support::Recorder;

fn rejects_with(message: &'static str) -> impl qed_rust::Promiser {
    move |_args: Args| async move { Err::<(), _>(HandlerError::from(message)) }
}

fn counting(qed: &Qed) -> Arc<AtomicUsize> {
    let count = Arc::new(AtomicUsize::new(0));
    let inner = Arc::clone(&count);
    qed.on_error(move |_| {
        inner.fetch_add(1, Ordering::SeqCst);
    });
    count
}

#[tokio::test]
async fn emits_error_with_request_and_response() {
    let qed = Qed::new();
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    qed.once(ERROR_EVENT, move |event| {
        sink.lock().unwrap().push((
            event.error.message(),
            event.req.resolve(&["trace".to_string()]),
            event.res.resolve(&["locals".to_string(), "user".to_string()]),
        ));
    });

    let handler: Handler<Value, Recorder> = qed.create_with(rejects_with("bazo"), Binding::none());
    let res = Recorder::new();
    handler
        .call(json!({ "trace": "t-1" }), res.clone())
        .unwrap()
        .await;

    assert_eq!(
        *seen.lock().unwrap(),
        vec![(
            "bazo".to_string(),
            Some(json!("t-1")),
            Some(json!("user-42"))
        )]
    );
    assert_eq!(res.sent(), vec![(500, json!("bazo"))]);
}

#[tokio::test]
async fn emits_exactly_once_per_failure() {
    let qed = Qed::new();
    let count = counting(&qed);
    let handler: Handler<Value, Recorder> = qed.create_with(rejects_with("x"), Binding::none());

    handler.call(json!({}), Recorder::new()).unwrap().await;
    handler.call(json!({}), Recorder::new()).unwrap().await;
    assert_eq!(count.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn successes_are_not_emitted() {
    let qed = Qed::new();
    let count = counting(&qed);
    let handler: Handler<Value, Recorder> = qed.create_with(
        immediate(|_args: Args| Ok::<_, HandlerError>(1)),
        Binding::none(),
    );

    handler.call(json!({}), Recorder::new()).unwrap().await;
    assert_eq!(count.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn emission_ignores_writability() {
    let qed = Qed::new();
    let count = counting(&qed);
    let handler: Handler<Value, Recorder> = qed.create_with(rejects_with("x"), Binding::none());

    handler.call(json!({}), Recorder::with_writable(false)).unwrap().await;
    assert_eq!(count.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn emission_happens_alongside_a_custom_strategy() {
    let qed = Qed::new();
    let count = counting(&qed);
    let handler: Handler<Value, Recorder> = qed.create_with(rejects_with("x"), Binding::none());
    handler.respond_with(|_, _| {});

    handler.call(json!({}), Recorder::new()).unwrap().await;
    assert_eq!(count.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn no_subscribers_still_gets_a_response() {
    let handler: Handler<Value, Recorder> = Qed::new().create_with(rejects_with("lonely"), Binding::none());
    let res = Recorder::new();
    handler.call(json!({}), res.clone()).unwrap().await;
    assert_eq!(res.sent(), vec![(500, json!("lonely"))]);
}

#[tokio::test]
async fn a_panicking_listener_does_not_block_the_response() {
    let qed = Qed::new();
    qed.on_error(|_| panic!("listener bug"));
    let handler: Handler<Value, Recorder> = qed.create_with(rejects_with("x"), Binding::none());

    let res = Recorder::new();
    handler.call(json!({}), res.clone()).unwrap().await;
    assert_eq!(res.sent(), vec![(500, json!("x"))]);
}

#[tokio::test]
async fn factories_sharing_a_channel_share_listeners() {
    let channel = ErrorChannel::new();
    let first = Qed::with_channel(channel.clone());
    let second = Qed::with_channel(channel.clone());
    let count = counting(&first);

    let handler: Handler<Value, Recorder> = second.create_with(rejects_with("x"), Binding::none());
    handler.call(json!({}), Recorder::new()).unwrap().await;
    assert_eq!(count.load(Ordering::SeqCst), 1);

    channel.remove_all_listeners();
    handler.call(json!({}), Recorder::new()).unwrap().await;
    assert_eq!(count.load(Ordering::SeqCst), 1);
}

#[test]
fn handler_requires_req_and_res() {
    let calls = Arc::new(AtomicUsize::new(0));
    let inner = Arc::clone(&calls);
    let handler: Handler<Value, Recorder> = Qed::new().create_with(
        immediate(move |_args: Args| {
            inner.fetch_add(1, Ordering::SeqCst);
            Ok::<_, HandlerError>(())
        }),
        Binding::none(),
    );

    let err = handler.call(Value::Null, Recorder::new()).err().unwrap();
    assert_eq!(err, InvocationError::MissingRequestOrResponse);
    assert_eq!(err.to_string(), "Handler must be invoked with req and res objects");

    assert!(handler.call(json!({}), Recorder::absent()).is_err());
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}
