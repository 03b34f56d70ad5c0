//! Factory creation and validation.

use qed_rust::{immediate, Args, Binding, ConfigError, Handler, HandlerError, Promiser, Qed};
use serde_json::Value;

use crate::support::Recorder;

type TestHandler = Handler<Value, Recorder>;

fn noop() -> impl Promiser {
    immediate(|_args: Args| Ok::<_, HandlerError>(()))
}

#[test]
fn accepts_req_and_res_accessors() {
    let qed = Qed::new();
    let handler: Result<TestHandler, _> = qed.create(noop(), ["req.foo", "res.bar.baz", "req."]);
    assert_eq!(handler.unwrap().arity(), 3);
}

#[test]
fn rejects_other_prefixes() {
    let qed = Qed::new();
    let handler: Result<TestHandler, _> = qed.create(noop(), ["req.ok", "request.foo"]);
    assert_eq!(
        handler.unwrap_err(),
        ConfigError::InvalidAccessor("request.foo".to_string())
    );
}

#[test]
fn no_accessors_means_no_arguments() {
    let qed = Qed::new();
    let handler: TestHandler = qed.create_with(noop(), Binding::none());
    assert_eq!(handler.arity(), 0);
}

#[test]
fn whole_binding_has_two_arguments() {
    let qed = Qed::new();
    let handler: TestHandler = qed.create_whole(noop());
    assert_eq!(handler.arity(), 2);
}

#[test]
fn new_handler_uses_default_configuration() {
    let qed = Qed::new();
    let handler: TestHandler = qed.create_whole(noop());
    let config = handler.config();
    assert_eq!(config.status, None);
    assert!(!config.custom);
}

#[test]
fn global_factory_is_shared() {
    assert!(std::ptr::eq(Qed::global(), Qed::global()));

    let handler: Result<TestHandler, _> = qed_rust::create(noop(), ["req.id"]);
    assert!(handler.is_ok());
    let handler: TestHandler = qed_rust::create_whole(noop());
    assert_eq!(handler.arity(), 2);
}

#[test]
fn factory_exposes_observer_surface() {
    let qed = Qed::new();
    let id = qed.on_error(|_| {});
    qed.once("error", |_| {});
    assert_eq!(qed.listener_count("error"), 2);

    assert!(qed.remove_listener(id));
    assert_eq!(qed.listener_count("error"), 1);

    qed.remove_all_listeners();
    assert_eq!(qed.listener_count("error"), 0);
}
