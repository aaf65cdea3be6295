//! Outbound requests, notifications and batching

use crate::pending::{PendingCall, PendingTable};
use parking_lot::Mutex;
use rpcwire_core::{Batch, Id, Message, Params, Request, Unit};
use rpcwire_transport::{MessageSink, SendError};
use std::sync::Arc;
use tracing::{debug, warn};

/// Generate a fresh request id
///
/// Ids are drawn uniformly from `0..2^32` by a thread-local CSPRNG, so
/// collisions between concurrently outstanding calls are negligible.
pub fn generate_id() -> Id {
    Id::Number(i64::from(rand::random::<u32>()))
}

/// Sender for outbound traffic
///
/// Calls are registered in the [`PendingTable`] before they reach the
/// transport, so a response can never outrun its entry. While a batch is
/// open, outbound units are buffered instead of sent.
///
/// # Example
///
/// ```ignore
/// let outbox = Outbox::new(sink, table);
/// let sum = outbox.request("sum", Some(params)).await?;
/// let total: i64 = sum.typed().await?;
/// ```
pub struct Outbox {
    sink: Arc<dyn MessageSink>,
    table: Arc<PendingTable>,
    batch: Mutex<Option<Vec<Unit>>>,
}

impl Outbox {
    pub fn new(sink: Arc<dyn MessageSink>, table: Arc<PendingTable>) -> Self {
        Self {
            sink,
            table,
            batch: Mutex::new(None),
        }
    }

    pub fn table(&self) -> &Arc<PendingTable> {
        &self.table
    }

    /// Start buffering outbound units, discarding any batch already open
    pub fn start_batch(&self) {
        if let Some(dropped) = self.batch.lock().replace(Vec::new())
            && !dropped.is_empty()
        {
            warn!(count = dropped.len(), "open batch replaced, buffered units discarded");
        }
    }

    /// Close the open batch and send its units as one message
    ///
    /// Does nothing when no batch is open or the batch is empty. If the
    /// transport rejects the batch, every call it carried is cancelled.
    pub async fn send_batch(&self) -> Result<(), SendError> {
        let units = match self.batch.lock().take() {
            Some(units) if !units.is_empty() => units,
            _ => return Ok(()),
        };
        let ids: Vec<Id> = units
            .iter()
            .filter_map(|unit| match unit {
                Unit::Request(request) => request.id().cloned(),
                Unit::Response(_) => None,
            })
            .collect();

        debug!(count = units.len(), "sending batch");
        if let Err(err) = self.sink.send(Batch::from(units).into()).await {
            for id in &ids {
                self.table.cancel(id);
            }
            warn!(cancelled = ids.len(), "batch send failed, calls cancelled");
            return Err(err);
        }
        Ok(())
    }

    /// Close the open batch without sending it, returning how many units
    /// were discarded
    ///
    /// Calls buffered in the batch stay registered; cancel them through
    /// [`PendingTable::cancel`] if no response will ever come.
    pub fn end_batch(&self) -> usize {
        self.batch.lock().take().map_or(0, |units| units.len())
    }

    pub fn is_batching(&self) -> bool {
        self.batch.lock().is_some()
    }

    /// Number of calls still waiting for a response
    pub fn pending(&self) -> usize {
        self.table.len()
    }

    /// Send a call and return the future of its result
    ///
    /// The call is registered before it is sent. If the transport rejects
    /// it, the registration is withdrawn and the error returned.
    pub async fn request(
        &self,
        method: impl Into<String>,
        params: Option<Params>,
    ) -> Result<PendingCall, SendError> {
        let id = generate_id();
        let request = Request::call(method, params, id.clone());
        let call = self.table.track(&request);

        if let Err(err) = self.send(request.into()).await {
            self.table.cancel(&id);
            return Err(err);
        }
        Ok(call)
    }

    /// Send a notification
    pub async fn notify(
        &self,
        method: impl Into<String>,
        params: Option<Params>,
    ) -> Result<(), SendError> {
        self.send(Request::notification(method, params).into()).await
    }

    /// Send a unit, or buffer it while a batch is open
    pub async fn send(&self, unit: Unit) -> Result<(), SendError> {
        match self.buffer(unit) {
            Some(unit) => self.sink.send(Message::from(unit)).await,
            None => Ok(()),
        }
    }

    fn buffer(&self, unit: Unit) -> Option<Unit> {
        let mut batch = self.batch.lock();
        match batch.as_mut() {
            Some(units) => {
                units.push(unit);
                None
            }
            None => Some(unit),
        }
    }
}
