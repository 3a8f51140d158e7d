use framelink_sdk::{EventHub, EventKey};
use regex_lite::Regex;
use serde_json::{Value, json};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

fn counter() -> (Arc<AtomicUsize>, impl Fn(&str, &[Value]) + Send + Sync) {
    let count = Arc::new(AtomicUsize::new(0));
    let seen = Arc::clone(&count);
    (count, move |_event: &str, _args: &[Value]| {
        seen.fetch_add(1, Ordering::SeqCst);
    })
}

#[test]
fn exact_listener_matches_only_its_event() {
    let hub = EventHub::new();
    let (count, callback) = counter();
    hub.on("set", callback);

    hub.emit("set", &[]);
    hub.emit("delete", &[]);

    assert_eq!(count.load(Ordering::SeqCst), 1);
}

#[test]
fn pattern_listener_matches_by_regex() {
    let hub = EventHub::new();
    let (count, callback) = counter();
    hub.on(Regex::new("^player:").unwrap(), callback);

    hub.emit("player:join", &[]);
    hub.emit("player:leave", &[]);
    hub.emit("chat", &[]);

    assert_eq!(count.load(Ordering::SeqCst), 2);
}

#[test]
fn listeners_receive_event_name_and_args() {
    let hub = EventHub::new();
    let seen: Arc<std::sync::Mutex<Vec<(String, Vec<Value>)>>> = Arc::default();
    let sink = Arc::clone(&seen);
    hub.on(EventKey::Pattern(Regex::new(".").unwrap()), move |event, args| {
        sink.lock().unwrap().push((event.to_owned(), args.to_vec()));
    });

    hub.emit("moved", &[json!(3), json!(4)]);

    let seen = seen.lock().unwrap();
    assert_eq!(seen.as_slice(), [("moved".to_owned(), vec![json!(3), json!(4)])]);
}

#[test]
fn sealed_hub_delivers_nothing() {
    let hub = EventHub::new();
    let (count, callback) = counter();
    hub.on("set", callback);

    hub.emit("set", &[]);
    hub.seal();
    hub.emit("set", &[]);

    assert_eq!(count.load(Ordering::SeqCst), 1);
}

#[test]
fn callback_may_register_another_listener() {
    let hub = Arc::new(EventHub::new());
    let count = Arc::new(AtomicUsize::new(0));
    let inner = Arc::clone(&hub);
    let registered = Arc::clone(&count);
    hub.on("first", move |_event, _args| {
        // Must not deadlock against the dispatching emit.
        let seen = Arc::clone(&registered);
        inner.on("second", move |_e, _a| {
            seen.fetch_add(1, Ordering::SeqCst);
        });
    });

    hub.emit("first", &[]);
    hub.emit("second", &[]);
    assert_eq!(count.load(Ordering::SeqCst), 1);
}
