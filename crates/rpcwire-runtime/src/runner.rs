//! Method registry and request execution

use async_trait::async_trait;
use futures::FutureExt;
use parking_lot::RwLock;
use rpcwire_core::{ErrorCode, MethodError, Params, Request, Response, RpcConfig, RpcError};
use serde_json::Value;
use std::any::Any;
use std::collections::HashMap;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use tracing::{debug, error, warn};

/// Result returned by a method handler
pub type MethodResult = Result<Value, MethodError>;

/// A registered JSON-RPC method
///
/// Closures can be registered directly through [`Runner::register`]; implement
/// this trait for handlers that carry their own state.
///
/// # Example
///
/// ```ignore
/// struct Sum;
///
/// #[async_trait::async_trait]
/// impl Method for Sum {
///     async fn call(&self, params: Option<Params>) -> MethodResult {
///         let numbers: Vec<i64> = params.map(|p| p.parse()).transpose()?.unwrap_or_default();
///         Ok(numbers.iter().sum::<i64>().into())
///     }
/// }
/// ```
#[async_trait]
pub trait Method: Send + Sync + 'static {
    async fn call(&self, params: Option<Params>) -> MethodResult;
}

struct FnMethod<F>(F);

#[async_trait]
impl<F, Fut> Method for FnMethod<F>
where
    F: Fn(Option<Params>) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = MethodResult> + Send + 'static,
{
    async fn call(&self, params: Option<Params>) -> MethodResult {
        (self.0)(params).await
    }
}

/// Registry mapping method names to handlers
///
/// Every name is stored as `prefix + name`, so runners with different
/// prefixes can share a process without clashing. Registration overwrites
/// silently; lookups never hold the lock while a handler runs.
pub struct Runner {
    prefix: String,
    methods: RwLock<HashMap<String, Arc<dyn Method>>>,
}

impl Runner {
    /// Create an empty runner with no prefix
    pub fn new() -> Self {
        Self::with_prefix("")
    }

    /// Create an empty runner namespacing every method under `prefix`
    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            methods: RwLock::new(HashMap::new()),
        }
    }

    pub fn from_config(config: &RpcConfig) -> Self {
        Self::with_prefix(config.method_prefix.clone())
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    fn full_name(&self, name: &str) -> String {
        format!("{}{}", self.prefix, name)
    }

    /// Register a closure under `name`, replacing any existing handler
    pub fn register<F, Fut>(&self, name: &str, handler: F)
    where
        F: Fn(Option<Params>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = MethodResult> + Send + 'static,
    {
        self.register_method(name, FnMethod(handler));
    }

    /// Register a [`Method`] implementation under `name`
    pub fn register_method(&self, name: &str, method: impl Method) {
        let full_name = self.full_name(name);
        let replaced = self
            .methods
            .write()
            .insert(full_name.clone(), Arc::new(method))
            .is_some();
        if replaced {
            warn!(method = %full_name, "method re-registered, previous handler replaced");
        } else {
            debug!(method = %full_name, "method registered");
        }
    }

    /// Remove a method, returning whether it was registered
    pub fn remove(&self, name: &str) -> bool {
        self.methods.write().remove(&self.full_name(name)).is_some()
    }

    pub fn has(&self, name: &str) -> bool {
        self.methods.read().contains_key(&self.full_name(name))
    }

    pub fn clear(&self) {
        self.methods.write().clear();
    }

    /// Full (prefixed) names of every registered method, sorted
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.methods.read().keys().cloned().collect();
        names.sort();
        names
    }

    pub fn len(&self) -> usize {
        self.methods.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.methods.read().is_empty()
    }

    /// Invoke a method by name
    ///
    /// An unknown name fails with `MethodNotFound`, carrying both the prefixed
    /// and the requested name and listing what is registered.
    /// Any handler failure other than an [`RpcError`] (including a panic) is
    /// reported as `InternalError` carrying the original text, a trace, the
    /// method name and the params.
    pub async fn call(&self, name: &str, params: Option<Params>) -> Result<Value, RpcError> {
        let full_name = self.full_name(name);
        let method = self.methods.read().get(&full_name).cloned();
        let Some(method) = method else {
            debug!(method = %full_name, "method not found");
            return Err(RpcError::new(ErrorCode::MethodNotFound)
                .with_data("method", full_name)
                .with_data("name", name)
                .with_data("available", self.names()));
        };

        debug!(method = %full_name, "invoking method");
        let diagnostic_params = params.as_ref().map(Params::to_value).unwrap_or(Value::Null);
        let outcome = AssertUnwindSafe(method.call(params)).catch_unwind().await;

        match outcome {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(MethodError::Rpc(err))) => Err(err),
            Ok(Err(MethodError::Failed { message, trace })) => {
                Err(internal_error(&full_name, diagnostic_params, message, trace))
            }
            Err(panic) => {
                let message = panic_to_string(&*panic);
                error!(method = %full_name, "method handler panicked: {}", message);
                Err(internal_error(
                    &full_name,
                    diagnostic_params,
                    message,
                    "handler panicked".to_string(),
                ))
            }
        }
    }

    /// Execute a request against the registry
    ///
    /// Calls always get a response, success or error. Notifications run for
    /// effect only and never get one, even when the handler fails.
    pub async fn execute_request(&self, request: Request) -> Option<Response> {
        let (method, params, id) = request.into_parts();
        let outcome = self.call(&method, params).await;

        match id {
            Some(id) => Some(match outcome {
                Ok(value) => Response::success(id, value),
                Err(err) => Response::failure(id, err),
            }),
            None => {
                if let Err(err) = outcome {
                    warn!(method = %method, code = err.code, "notification failed: {}", err.message);
                }
                None
            }
        }
    }
}

impl Default for Runner {
    fn default() -> Self {
        Self::new()
    }
}

fn internal_error(method: &str, params: Value, message: String, trace: String) -> RpcError {
    RpcError::new(ErrorCode::InternalError)
        .with_data("error", message)
        .with_data("trace", trace)
        .with_data("method", method)
        .with_data("params", params)
}

fn panic_to_string(panic: &(dyn Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "handler panicked with unknown payload".to_string()
    }
}

#[cfg(test)]
#[path = "runner/runner_tests.rs"]
mod runner_tests;
