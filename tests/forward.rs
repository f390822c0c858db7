#![cfg(feature = "forward")]

use serde_json::{json, Value};
use std::collections::BTreeMap;
use std::io::Read;
use std::net::TcpListener;
use std::thread;
use tracing_fluent_hook::forward::ForwardTransport;
use tracing_fluent_hook::{Entry, FluentHook, Hook, HookError, Severity};

type Event = (String, i64, BTreeMap<String, Value>);

#[test]
fn posts_message_mode_event_over_tcp() {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();

    let server = thread::spawn(move || {
        let (mut socket, _) = listener.accept().unwrap();
        let mut bytes = Vec::new();
        // The hook closes the connection after one post.
        socket.read_to_end(&mut bytes).unwrap();
        rmp_serde::from_slice::<Event>(&bytes).unwrap()
    });

    let hook = FluentHook::new("127.0.0.1", port, "svc");
    let mut entry = Entry::new(Severity::Error, "boom").with_field("order", 1234);
    let time = entry.time;
    hook.fire(&mut entry).unwrap();

    let (tag, secs, record) = server.join().unwrap();
    assert_eq!(tag, "svc.error");
    assert_eq!(secs, time.timestamp());
    assert_eq!(record["level"], json!("error"));
    assert_eq!(record["message"], json!("boom"));
    assert_eq!(record["order"], json!(1234));
    assert!(record["caller"].as_str().unwrap().starts_with("tests/forward.rs:"));
}

#[test]
fn unreachable_collector_is_a_connect_error() {
    // Bind then drop so the port is very likely closed.
    let port = {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };

    let hook = FluentHook::with_transport(ForwardTransport::default(), "127.0.0.1", port, "svc");
    let mut entry = Entry::new(Severity::Warn, "nobody home");

    let err = hook.fire(&mut entry).unwrap_err();
    assert!(matches!(err, HookError::Connect { .. }));
    assert!(entry.fields.is_empty());
}
