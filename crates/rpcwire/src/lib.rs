//! # rpcwire
//!
//! Transport-agnostic JSON-RPC 2.0 for async Rust.
//!
//! rpcwire handles the protocol layer and leaves the byte stream to you:
//! - A typed message model for requests, notifications, responses and batches
//! - Separator-delimited framing that works over any byte stream
//! - A method registry whose handler failures always become protocol errors
//! - Correlation of outbound calls with their responses
//! - A router for inbound traffic and an outbox for outbound traffic
//!
//! ## Serving methods
//!
//! ```ignore
//! use rpcwire::prelude::*;
//!
//! let runner = Arc::new(Runner::new());
//! runner.register("sum", |params: Option<Params>| async move {
//!     let numbers: Vec<i64> = params.map(|p| p.parse()).transpose()?.unwrap_or_default();
//!     Ok(json!(numbers.iter().sum::<i64>()))
//! });
//!
//! let router = Router::auto(runner, Arc::new(PendingTable::new()));
//! let reply = router.dispatch_bytes(br#"{"jsonrpc":"2.0","method":"sum","params":[1,2,3],"id":1}<EOM>"#, "<EOM>").await;
//! ```
//!
//! ## Calling a peer
//!
//! ```ignore
//! let outbox = Outbox::new(sink, table);
//! let total: i64 = outbox.request("sum", Some(params)).await?.typed().await?;
//! ```
//!
//! ## Crate Structure
//!
//! This is a facade crate that re-exports from:
//! - [`rpcwire_core`] - Message model, errors and configuration
//! - [`rpcwire_transport`] - Framing codec and transport sinks
//! - [`rpcwire_runtime`] - Registry, router, correlation table and outbox

pub mod global;
pub mod logging;

// Re-export core types
pub use rpcwire_core::{
    Batch, DEFAULT_SEPARATOR, ErrorCode, Id, JSONRPC_VERSION, LogLevel, Message, MethodError,
    Outcome, Params, ProtocolError, ProtocolResult, Request, Response, RpcConfig, RpcError, Unit,
};

// Re-export transport types
pub use rpcwire_transport::{
    ChannelSink, CodecError, Frame, FramedSink, MessageSink, SendError, SeparatorCodec,
    decode, decode_frame, encode,
};

// Re-export runtime types
pub use rpcwire_runtime::{
    CallError, Method, MethodResult, Outbox, PendingCall, PendingTable, Router, Runner,
    generate_id,
};

pub use global::{auto, auto_to, default_router, default_runner, default_table};
pub use logging::{init_logging, init_logging_with_level, set_log_level};

// Re-export common dependencies that handler authors need
pub use async_trait::async_trait;
pub use serde;
pub use serde_json;
pub use tokio;
pub use tracing;

/// Prelude module for convenient imports.
///
/// Use `use rpcwire::prelude::*;` to import commonly used types.
pub mod prelude {
    pub use crate::{
        Batch, CallError, ErrorCode, Id, Message, MessageSink, Method, MethodError,
        MethodResult, Outbox, Params, PendingCall, PendingTable, Request, Response, Router,
        RpcConfig, RpcError, Runner, SeparatorCodec, async_trait,
    };

    pub use serde::{Deserialize, Serialize};
    pub use serde_json::{Value, json};
    pub use std::sync::Arc;
}
