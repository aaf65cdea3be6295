#![allow(non_snake_case)]

use super::*;
use rpcwire_core::Id;
use serde_json::json;
use std::sync::atomic::{AtomicUsize, Ordering};

async fn ping(_params: Option<Params>) -> MethodResult {
    Ok(json!("pong"))
}

async fn sum(params: Option<Params>) -> MethodResult {
    let numbers: Vec<i64> = match params {
        Some(params) => params.parse()?,
        None => Vec::new(),
    };
    Ok(json!(numbers.iter().sum::<i64>()))
}

async fn explode(_params: Option<Params>) -> MethodResult {
    Err(MethodError::msg("disk full"))
}

async fn reject(_params: Option<Params>) -> MethodResult {
    Err(RpcError::custom(-32000, "quota exceeded")
        .with_data("limit", 10)
        .into())
}

async fn panics(_params: Option<Params>) -> MethodResult {
    panic!("boom");
}

fn params_of(value: Value) -> Option<Params> {
    Some(Params::try_from(value).unwrap())
}

struct Counter {
    hits: Arc<AtomicUsize>,
}

#[async_trait]
impl Method for Counter {
    async fn call(&self, _params: Option<Params>) -> MethodResult {
        let previous = self.hits.fetch_add(1, Ordering::SeqCst);
        Ok(json!(previous + 1))
    }
}

// Registry tests

#[test]
fn Runner___new___is_empty() {
    let runner = Runner::new();

    assert!(runner.is_empty());
    assert_eq!(runner.len(), 0);
    assert_eq!(runner.prefix(), "");
}

#[test]
fn Runner___register___makes_method_visible() {
    let runner = Runner::new();

    runner.register("ping", ping);

    assert!(runner.has("ping"));
    assert!(!runner.has("pong"));
    assert_eq!(runner.len(), 1);
}

#[test]
fn Runner___names___are_sorted() {
    let runner = Runner::new();
    runner.register("zeta", ping);
    runner.register("alpha", ping);
    runner.register("mid", ping);

    assert_eq!(runner.names(), vec!["alpha", "mid", "zeta"]);
}

#[test]
fn Runner___with_prefix___namespaces_registered_names() {
    let runner = Runner::with_prefix("math.");

    runner.register("sum", sum);

    assert!(runner.has("sum"));
    assert_eq!(runner.names(), vec!["math.sum"]);
    assert_eq!(runner.prefix(), "math.");
}

#[test]
fn Runner___from_config___uses_configured_prefix() {
    let config = RpcConfig::default().with_method_prefix("svc/");

    let runner = Runner::from_config(&config);

    assert_eq!(runner.prefix(), "svc/");
}

#[test]
fn Runner___remove___forgets_method() {
    let runner = Runner::new();
    runner.register("ping", ping);

    assert!(runner.remove("ping"));
    assert!(!runner.remove("ping"));
    assert!(!runner.has("ping"));
}

#[test]
fn Runner___clear___removes_everything() {
    let runner = Runner::new();
    runner.register("ping", ping);
    runner.register("sum", sum);

    runner.clear();

    assert!(runner.is_empty());
}

// Invocation tests

#[tokio::test]
async fn Runner___call___returns_handler_value() {
    let runner = Runner::new();
    runner.register("sum", sum);

    let value = runner.call("sum", params_of(json!([1, 2, 3]))).await.unwrap();

    assert_eq!(value, json!(6));
}

#[tokio::test]
async fn Runner___call_with_prefix___resolves_unprefixed_name() {
    let runner = Runner::with_prefix("math.");
    runner.register("sum", sum);

    let value = runner.call("sum", params_of(json!([4, 5]))).await.unwrap();

    assert_eq!(value, json!(9));
}

#[tokio::test]
async fn Runner___call_unknown___fails_with_method_not_found() {
    let runner = Runner::new();
    runner.register("ping", ping);
    runner.register("sum", sum);

    let err = runner.call("missing", None).await.unwrap_err();

    assert!(err.is(ErrorCode::MethodNotFound));
    assert_eq!(err.data_field("method"), &json!("missing"));
    assert_eq!(err.data_field("name"), &json!("missing"));
    assert_eq!(err.data_field("available"), &json!(["ping", "sum"]));
}

#[tokio::test]
async fn Runner___call_unknown_with_prefix___reports_requested_and_full_name() {
    let runner = Runner::with_prefix("math.");
    runner.register("sum", sum);

    let err = runner.call("div", None).await.unwrap_err();

    assert!(err.is(ErrorCode::MethodNotFound));
    assert_eq!(err.data_field("method"), &json!("math.div"));
    assert_eq!(err.data_field("name"), &json!("div"));
    assert_eq!(err.data_field("available"), &json!(["math.sum"]));
}

#[tokio::test]
async fn Runner___call_rpc_error___passes_through_verbatim() {
    let runner = Runner::new();
    runner.register("reject", reject);

    let err = runner.call("reject", None).await.unwrap_err();

    assert_eq!(err.code, -32000);
    assert_eq!(err.message, "quota exceeded");
    assert_eq!(err.data_field("limit"), &json!(10));
}

#[tokio::test]
async fn Runner___call_failure___becomes_internal_error_with_diagnostics() {
    let runner = Runner::new();
    runner.register("explode", explode);

    let err = runner
        .call("explode", params_of(json!({"path": "/tmp"})))
        .await
        .unwrap_err();

    assert!(err.is(ErrorCode::InternalError));
    assert_eq!(err.data_field("error"), &json!("disk full"));
    assert_eq!(err.data_field("method"), &json!("explode"));
    assert_eq!(err.data_field("params"), &json!({"path": "/tmp"}));
    assert!(err.data_field("trace").is_string());
}

#[tokio::test]
async fn Runner___call_bad_params___reports_internal_error() {
    let runner = Runner::new();
    runner.register("sum", sum);

    let err = runner
        .call("sum", params_of(json!(["one", "two"])))
        .await
        .unwrap_err();

    assert!(err.is(ErrorCode::InternalError));
    assert_eq!(err.data_field("params"), &json!(["one", "two"]));
}

#[tokio::test]
async fn Runner___call_panicking_handler___becomes_internal_error() {
    let runner = Runner::new();
    runner.register("panics", panics);

    let err = runner.call("panics", None).await.unwrap_err();

    assert!(err.is(ErrorCode::InternalError));
    assert_eq!(err.data_field("error"), &json!("boom"));
    assert_eq!(err.data_field("params"), &Value::Null);
}

#[tokio::test]
async fn Runner___register_twice___replaces_handler() {
    let runner = Runner::new();
    runner.register("greet", |_params| async { Ok::<_, MethodError>(json!("first")) });
    runner.register("greet", |_params| async { Ok::<_, MethodError>(json!("second")) });

    let value = runner.call("greet", None).await.unwrap();

    assert_eq!(value, json!("second"));
    assert_eq!(runner.len(), 1);
}

#[tokio::test]
async fn Runner___register_method___uses_trait_implementation() {
    let hits = Arc::new(AtomicUsize::new(0));
    let runner = Runner::new();
    runner.register_method("count", Counter { hits: hits.clone() });

    runner.call("count", None).await.unwrap();
    let value = runner.call("count", None).await.unwrap();

    assert_eq!(value, json!(2));
    assert_eq!(hits.load(Ordering::SeqCst), 2);
}

// Request execution tests

#[tokio::test]
async fn Runner___execute_call___responds_with_same_id() {
    let runner = Runner::new();
    runner.register("sum", sum);
    let request = Request::call("sum", params_of(json!([1, 2])), 7);

    let response = runner.execute_request(request).await.unwrap();

    assert_eq!(response.id(), Some(&Id::from(7)));
    assert_eq!(response.result(), Some(&json!(3)));
}

#[tokio::test]
async fn Runner___execute_failing_call___responds_with_error() {
    let runner = Runner::new();
    let request = Request::call("missing", None, "x");

    let response = runner.execute_request(request).await.unwrap();

    assert_eq!(response.id(), Some(&Id::from("x")));
    assert!(response.error().unwrap().is(ErrorCode::MethodNotFound));
}

#[tokio::test]
async fn Runner___execute_notification___produces_no_response() {
    let hits = Arc::new(AtomicUsize::new(0));
    let runner = Runner::new();
    runner.register_method("count", Counter { hits: hits.clone() });

    let response = runner
        .execute_request(Request::notification("count", None))
        .await;

    assert!(response.is_none());
    assert_eq!(hits.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn Runner___execute_failing_notification___swallows_error() {
    let runner = Runner::new();
    runner.register("explode", explode);

    let response = runner
        .execute_request(Request::notification("explode", None))
        .await;

    assert!(response.is_none());
}
