#![allow(non_snake_case)]

// The defaults are shared by every test in this binary, so each test uses
// method names and ids no other test touches.

use super::*;
use rpcwire_core::{Id, MethodError, Request, Response};
use rpcwire_transport::ChannelSink;
use serde_json::json;

#[test]
fn default_runner___returns_same_instance() {
    assert!(Arc::ptr_eq(default_runner(), default_runner()));
}

#[test]
fn default_table___returns_same_instance() {
    assert!(Arc::ptr_eq(default_table(), default_table()));
}

#[test]
fn register___adds_to_default_runner() {
    register("global.register_test", |_params| async {
        Ok::<_, MethodError>(json!(true))
    });

    assert!(default_runner().has("global.register_test"));
}

#[tokio::test]
async fn auto___executes_call_on_default_runner() {
    register("global.double", |params| async move {
        let n = params
            .and_then(|p| p.get_index(0).and_then(serde_json::Value::as_i64))
            .unwrap_or(0);
        Ok::<_, MethodError>(json!(n * 2))
    });
    let request = Request::call(
        "global.double",
        Some(Params::try_from(json!([21])).unwrap()),
        "g1",
    );

    let reply = auto(request.into()).await;

    assert_eq!(
        reply,
        Some(Message::Response(Response::success(Id::from("g1"), json!(42))))
    );
}

#[tokio::test]
async fn auto___resolves_default_table_entry() {
    let call = default_table().register(Id::from("global-resolve"));

    let reply = auto(Response::success(Id::from("global-resolve"), json!("ok")).into()).await;

    assert!(reply.is_none());
    assert_eq!(call.await.unwrap(), json!("ok"));
}

#[tokio::test]
async fn auto_to___sends_reply_to_sink() {
    register("global.echo", |params| async move {
        Ok::<_, MethodError>(params.map(|p| p.into_value()).unwrap_or_default())
    });
    let (sink, mut receiver) = ChannelSink::channel();
    let request = Request::call(
        "global.echo",
        Some(Params::try_from(json!({"a": 1})).unwrap()),
        "g2",
    );

    auto_to(request.into(), &sink).await.unwrap();

    let sent = receiver.recv().await.unwrap();
    assert_eq!(
        sent,
        Message::Response(Response::success(Id::from("g2"), json!({"a": 1})))
    );
}

#[tokio::test]
async fn outbox___correlates_in_default_table() {
    let (sink, mut receiver) = ChannelSink::channel();
    let outbox = outbox(Arc::new(sink));

    let call = outbox.request("global.remote", None).await.unwrap();
    let sent = receiver.recv().await.unwrap();

    assert!(default_table().is_pending(call.id()));
    if let Message::Request(request) = sent {
        default_table().resolve(Response::success(request.id().cloned(), json!(7)));
    }
    assert_eq!(call.await.unwrap(), json!(7));
}
