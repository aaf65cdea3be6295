//! Process-wide default instances
//!
//! Core types never reach for these; they exist for applications that want
//! one registry and one correlation table without threading them around.
//! Anything that needs isolation should construct its own instances.

use once_cell::sync::OnceCell;
use rpcwire_core::{Message, Params};
use rpcwire_runtime::{MethodResult, Outbox, PendingTable, Router, Runner};
use rpcwire_transport::{MessageSink, SendError};
use std::future::Future;
use std::sync::Arc;

static DEFAULT_RUNNER: OnceCell<Arc<Runner>> = OnceCell::new();
static DEFAULT_TABLE: OnceCell<Arc<PendingTable>> = OnceCell::new();

/// The process-wide default method registry
pub fn default_runner() -> &'static Arc<Runner> {
    DEFAULT_RUNNER.get_or_init(|| Arc::new(Runner::new()))
}

/// The process-wide default correlation table
pub fn default_table() -> &'static Arc<PendingTable> {
    DEFAULT_TABLE.get_or_init(|| Arc::new(PendingTable::new()))
}

/// Register a handler on the default registry
pub fn register<F, Fut>(name: &str, handler: F)
where
    F: Fn(Option<Params>) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = MethodResult> + Send + 'static,
{
    default_runner().register(name, handler);
}

/// Auto router bound to the default registry and table
pub fn default_router() -> Router {
    Router::auto(default_runner().clone(), default_table().clone())
}

/// Outbox sending through `sink` and correlating in the default table
pub fn outbox(sink: Arc<dyn MessageSink>) -> Outbox {
    Outbox::new(sink, default_table().clone())
}

/// Route a message with the default router, returning any reply
pub async fn auto(message: Message) -> Option<Message> {
    default_router().dispatch(message).await
}

/// Route a message with the default router and send any reply to `sink`
pub async fn auto_to(message: Message, sink: &dyn MessageSink) -> Result<(), SendError> {
    default_router().dispatch_to(message, sink).await
}

#[cfg(test)]
#[path = "global/global_tests.rs"]
mod global_tests;
