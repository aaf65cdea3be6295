//! rpcwire-runtime - Dispatch and correlation for JSON-RPC 2.0
//!
//! This crate provides:
//! - [`Runner`], the method registry that turns requests into responses
//! - [`PendingTable`], correlating outbound calls with inbound responses
//! - [`Router`], routing inbound messages to callbacks
//! - [`Outbox`], sending calls and notifications with optional batching

mod outbox;
mod pending;
mod router;
mod runner;

pub use outbox::{Outbox, generate_id};
pub use pending::{CallError, PendingCall, PendingTable};
pub use router::Router;
pub use runner::{Method, MethodResult, Runner};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        CallError, Method, MethodResult, Outbox, PendingCall, PendingTable, Router, Runner,
    };
}
