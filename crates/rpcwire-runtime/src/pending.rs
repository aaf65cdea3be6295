//! Correlation of outbound calls with their responses

use dashmap::DashMap;
use rpcwire_core::{Id, Request, Response, RpcError};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};
use thiserror::Error;
use tokio::sync::oneshot;
use tracing::{debug, warn};

type Completion = Result<Value, RpcError>;

/// Failure observed by a caller awaiting a response
#[derive(Error, Debug)]
pub enum CallError {
    /// The peer answered with an error object
    #[error(transparent)]
    Rpc(#[from] RpcError),

    /// The entry was cancelled or the table dropped before an answer arrived
    #[error("call cancelled before a response arrived")]
    Cancelled,

    /// The result did not have the requested shape
    #[error("failed to decode result: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Table of outstanding calls keyed by request id
///
/// Each entry is a one-shot completion handle. An entry is consumed by the
/// first matching response; later responses for the same id are ignored.
/// Operations on different ids never block one another.
#[derive(Default)]
pub struct PendingTable {
    pending: DashMap<Id, oneshot::Sender<Completion>>,
}

impl PendingTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register interest in the response to `request`
    ///
    /// # Panics
    ///
    /// Panics if `request` is a notification, which never gets a response.
    pub fn track(&self, request: &Request) -> PendingCall {
        match request.id() {
            Some(id) => self.register(id.clone()),
            None => panic!(
                "cannot await a response to notification `{}`",
                request.method()
            ),
        }
    }

    /// Register interest in the response carrying `id`
    ///
    /// Registering an id that is already outstanding replaces the earlier
    /// entry, whose caller observes [`CallError::Cancelled`].
    pub fn register(&self, id: Id) -> PendingCall {
        let (sender, receiver) = oneshot::channel();
        if self.pending.insert(id.clone(), sender).is_some() {
            warn!(id = %id, "pending id reused, earlier caller cancelled");
        }
        debug!(id = %id, "awaiting response");
        PendingCall { id, receiver }
    }

    /// Complete the entry matching `response`
    ///
    /// Returns whether a waiting caller was found. Responses without an id,
    /// with an unknown id, or for an already resolved id are ignored.
    pub fn resolve(&self, response: Response) -> bool {
        let Some(id) = response.id().cloned() else {
            debug!("response without id ignored");
            return false;
        };
        let Some((_, sender)) = self.pending.remove(&id) else {
            warn!(id = %id, "response for unknown id ignored");
            return false;
        };
        if sender.send(response.into_result()).is_err() {
            debug!(id = %id, "caller stopped waiting before response arrived");
        }
        true
    }

    /// Drop the entry for `id`, waking its caller with [`CallError::Cancelled`]
    pub fn cancel(&self, id: &Id) -> bool {
        self.pending.remove(id).is_some()
    }

    /// Cancel every outstanding entry, returning how many there were
    pub fn cancel_all(&self) -> usize {
        let count = self.pending.len();
        self.pending.clear();
        count
    }

    pub fn is_pending(&self, id: &Id) -> bool {
        self.pending.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

/// Future resolving to the outcome of one outstanding call
#[derive(Debug)]
pub struct PendingCall {
    id: Id,
    receiver: oneshot::Receiver<Completion>,
}

impl PendingCall {
    pub fn id(&self) -> &Id {
        &self.id
    }

    /// Await the result and deserialize it into `T`
    pub async fn typed<T: DeserializeOwned>(self) -> Result<T, CallError> {
        let value = self.await?;
        Ok(serde_json::from_value(value)?)
    }
}

impl Future for PendingCall {
    type Output = Result<Value, CallError>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        Pin::new(&mut self.receiver).poll(cx).map(|received| match received {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(err)) => Err(CallError::Rpc(err)),
            Err(_) => Err(CallError::Cancelled),
        })
    }
}

#[cfg(test)]
#[path = "pending/pending_tests.rs"]
mod pending_tests;
