#![allow(non_snake_case)]

use super::*;
use rpcwire_core::ErrorCode;
use serde::Deserialize;
use serde_json::json;

#[derive(Debug, Deserialize, PartialEq)]
struct Point {
    x: i64,
    y: i64,
}

#[tokio::test]
async fn PendingTable___resolve___completes_waiting_call() {
    let table = PendingTable::new();
    let call = table.register(Id::from(7));

    assert!(table.resolve(Response::success(Id::from(7), json!(42))));

    assert_eq!(call.await.unwrap(), json!(42));
    assert!(table.is_empty());
}

#[tokio::test]
async fn PendingTable___resolve_error___surfaces_rpc_error() {
    let table = PendingTable::new();
    let call = table.register(Id::from("a"));

    table.resolve(Response::failure(
        Id::from("a"),
        RpcError::new(ErrorCode::MethodNotFound),
    ));

    match call.await {
        Err(CallError::Rpc(err)) => assert!(err.is(ErrorCode::MethodNotFound)),
        other => panic!("expected rpc error, got {other:?}"),
    }
}

#[test]
fn PendingTable___resolve_twice___second_is_noop() {
    let table = PendingTable::new();
    let _call = table.register(Id::from(7));

    assert!(table.resolve(Response::success(Id::from(7), json!(42))));
    assert!(!table.resolve(Response::success(Id::from(7), json!(43))));
}

#[test]
fn PendingTable___resolve_unknown_id___is_ignored() {
    let table = PendingTable::new();
    let _call = table.register(Id::from(1));

    assert!(!table.resolve(Response::success(Id::from(2), json!(null))));
    assert!(table.is_pending(&Id::from(1)));
}

#[test]
fn PendingTable___resolve_without_id___is_ignored() {
    let table = PendingTable::new();
    let _call = table.register(Id::from(1));

    assert!(!table.resolve(Response::failure(
        None,
        RpcError::new(ErrorCode::ParseError)
    )));
    assert_eq!(table.len(), 1);
}

#[test]
fn PendingTable___number_and_string_ids___are_distinct() {
    let table = PendingTable::new();
    let _call = table.register(Id::from(1));

    assert!(!table.resolve(Response::success(Id::from("1"), json!(true))));
    assert!(table.is_pending(&Id::from(1)));
}

#[tokio::test]
async fn PendingTable___track___uses_request_id() {
    let table = PendingTable::new();
    let request = Request::call("sum", None, "req-1");

    let call = table.track(&request);
    table.resolve(Response::success(Id::from("req-1"), json!(3)));

    assert_eq!(call.id(), &Id::from("req-1"));
    assert_eq!(call.await.unwrap(), json!(3));
}

#[test]
#[should_panic(expected = "notification")]
fn PendingTable___track_notification___panics() {
    let table = PendingTable::new();

    let _ = table.track(&Request::notification("tick", None));
}

#[tokio::test]
async fn PendingTable___cancel___wakes_caller_with_cancelled() {
    let table = PendingTable::new();
    let call = table.register(Id::from(5));

    assert!(table.cancel(&Id::from(5)));
    assert!(!table.cancel(&Id::from(5)));

    assert!(matches!(call.await, Err(CallError::Cancelled)));
}

#[tokio::test]
async fn PendingTable___cancel_all___drains_table() {
    let table = PendingTable::new();
    let first = table.register(Id::from(1));
    let second = table.register(Id::from(2));

    assert_eq!(table.cancel_all(), 2);

    assert!(table.is_empty());
    assert!(matches!(first.await, Err(CallError::Cancelled)));
    assert!(matches!(second.await, Err(CallError::Cancelled)));
}

#[tokio::test]
async fn PendingTable___register_same_id___cancels_earlier_caller() {
    let table = PendingTable::new();
    let earlier = table.register(Id::from(9));
    let later = table.register(Id::from(9));

    table.resolve(Response::success(Id::from(9), json!("later")));

    assert!(matches!(earlier.await, Err(CallError::Cancelled)));
    assert_eq!(later.await.unwrap(), json!("later"));
}

#[test]
fn PendingTable___resolve_after_caller_dropped___still_consumes_entry() {
    let table = PendingTable::new();
    drop(table.register(Id::from(3)));

    assert!(table.resolve(Response::success(Id::from(3), json!(1))));
    assert!(table.is_empty());
}

#[tokio::test]
async fn PendingCall___typed___deserializes_result() {
    let table = PendingTable::new();
    let call = table.register(Id::from(1));
    table.resolve(Response::success(Id::from(1), json!({"x": 1, "y": 2})));

    let point: Point = call.typed().await.unwrap();

    assert_eq!(point, Point { x: 1, y: 2 });
}

#[tokio::test]
async fn PendingCall___typed_wrong_shape___fails_with_decode() {
    let table = PendingTable::new();
    let call = table.register(Id::from(1));
    table.resolve(Response::success(Id::from(1), json!("nope")));

    let result = call.typed::<Point>().await;

    assert!(matches!(result, Err(CallError::Decode(_))));
}

#[tokio::test]
async fn PendingTable___concurrent_resolution___completes_every_call() {
    let table = std::sync::Arc::new(PendingTable::new());
    let calls: Vec<PendingCall> = (0..64).map(|i| table.register(Id::from(i))).collect();

    let mut tasks = Vec::new();
    for i in (0..64).rev() {
        let table = table.clone();
        tasks.push(tokio::spawn(async move {
            table.resolve(Response::success(Id::from(i), json!(i * 2)));
        }));
    }
    for task in tasks {
        task.await.unwrap();
    }

    for (i, call) in calls.into_iter().enumerate() {
        assert_eq!(call.await.unwrap(), json!(i * 2));
    }
    assert!(table.is_empty());
}
