//! Routing of inbound messages to callbacks
//!
//! A [`Router`] is assembled from optional callbacks, one per message kind.
//! [`Router::auto`] wires the standard behavior: calls and notifications go
//! to a [`Runner`], responses complete entries in a [`PendingTable`].

use crate::pending::PendingTable;
use crate::runner::Runner;
use futures::FutureExt;
use futures::future::BoxFuture;
use rpcwire_core::{
    Batch, ErrorCode, Id, Message, Outcome, ProtocolResult, Request, Response, RpcError, Unit,
};
use rpcwire_transport::{MessageSink, SendError, decode};
use serde_json::Value;
use std::future::Future;
use std::sync::Arc;
use tracing::{debug, warn};

type BatchHandler = Arc<dyn Fn(Batch) -> BoxFuture<'static, Option<Message>> + Send + Sync>;
type RequestHandler = Arc<dyn Fn(Request) -> BoxFuture<'static, Option<Response>> + Send + Sync>;
type NotificationHandler = Arc<dyn Fn(Request) -> BoxFuture<'static, ()> + Send + Sync>;
type ResponseHandler = Arc<dyn Fn(Response) + Send + Sync>;
type ResultHandler = Arc<dyn Fn(Option<&Id>, &Value) + Send + Sync>;
type ErrorHandler = Arc<dyn Fn(Option<&Id>, &RpcError) + Send + Sync>;

/// Dispatcher for decoded messages
///
/// Every callback is optional. Batch members are routed one at a time in
/// input order; a reply is produced only for calls.
///
/// # Example
///
/// ```ignore
/// let router = Router::auto(runner.clone(), table.clone());
/// if let Some(reply) = router.dispatch(message).await {
///     sink.send(reply).await?;
/// }
/// ```
#[derive(Clone, Default)]
pub struct Router {
    on_batch: Option<BatchHandler>,
    on_request: Option<RequestHandler>,
    on_call: Option<RequestHandler>,
    on_notification: Option<NotificationHandler>,
    on_response: Option<ResponseHandler>,
    on_result: Option<ResultHandler>,
    on_error: Option<ErrorHandler>,
}

impl Router {
    pub fn new() -> Self {
        Self::default()
    }

    /// Router executing requests on `runner` and resolving responses in `table`
    pub fn auto(runner: Arc<Runner>, table: Arc<PendingTable>) -> Self {
        let call_runner = runner.clone();
        Self::new()
            .on_call(move |request| {
                let runner = call_runner.clone();
                async move { runner.execute_request(request).await }
            })
            .on_notification(move |request| {
                let runner = runner.clone();
                async move {
                    runner.execute_request(request).await;
                }
            })
            .on_response(move |response| {
                table.resolve(response);
            })
    }

    /// Handle whole batches, bypassing per-member routing
    pub fn on_batch<F, Fut>(mut self, handler: F) -> Self
    where
        F: Fn(Batch) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Option<Message>> + Send + 'static,
    {
        self.on_batch = Some(Arc::new(move |batch| handler(batch).boxed()));
        self
    }

    /// Handle every request, taking precedence over the call and
    /// notification handlers
    pub fn on_request<F, Fut>(mut self, handler: F) -> Self
    where
        F: Fn(Request) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Option<Response>> + Send + 'static,
    {
        self.on_request = Some(Arc::new(move |request| handler(request).boxed()));
        self
    }

    pub fn on_call<F, Fut>(mut self, handler: F) -> Self
    where
        F: Fn(Request) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Option<Response>> + Send + 'static,
    {
        self.on_call = Some(Arc::new(move |request| handler(request).boxed()));
        self
    }

    pub fn on_notification<F, Fut>(mut self, handler: F) -> Self
    where
        F: Fn(Request) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        self.on_notification = Some(Arc::new(move |request| handler(request).boxed()));
        self
    }

    /// Observe every response after the result or error handler has run
    pub fn on_response<F>(mut self, handler: F) -> Self
    where
        F: Fn(Response) + Send + Sync + 'static,
    {
        self.on_response = Some(Arc::new(handler));
        self
    }

    pub fn on_result<F>(mut self, handler: F) -> Self
    where
        F: Fn(Option<&Id>, &Value) + Send + Sync + 'static,
    {
        self.on_result = Some(Arc::new(handler));
        self
    }

    pub fn on_error<F>(mut self, handler: F) -> Self
    where
        F: Fn(Option<&Id>, &RpcError) + Send + Sync + 'static,
    {
        self.on_error = Some(Arc::new(handler));
        self
    }

    /// Route one message, returning the reply to send back, if any
    ///
    /// A call yields its response. A batch yields a batch of the responses
    /// produced by its members, or nothing when there are none.
    pub async fn dispatch(&self, message: Message) -> Option<Message> {
        match message {
            Message::Request(request) => self.dispatch_request(request).await.map(Message::from),
            Message::Response(response) => {
                self.dispatch_response(response);
                None
            }
            Message::Batch(batch) => self.dispatch_batch(batch).await,
        }
    }

    /// Route a decoded frame
    ///
    /// A frame that failed to decode is answered with an error response
    /// carrying a null id, since the offending request's id is unknown.
    pub async fn dispatch_frame(&self, frame: ProtocolResult<Message>) -> Option<Message> {
        match frame {
            Ok(message) => self.dispatch(message).await,
            Err(err) => {
                warn!("rejecting malformed frame: {}", err);
                Some(Response::failure(None, err.to_rpc_error()).into())
            }
        }
    }

    /// Decode separator-framed bytes and route the result
    pub async fn dispatch_bytes(&self, data: &[u8], separator: &str) -> Option<Message> {
        self.dispatch_frame(decode(data, separator)).await
    }

    /// Route a message and hand any reply to `sink`
    pub async fn dispatch_to(
        &self,
        message: Message,
        sink: &dyn MessageSink,
    ) -> Result<(), SendError> {
        match self.dispatch(message).await {
            Some(reply) => sink.send(reply).await,
            None => Ok(()),
        }
    }

    async fn dispatch_batch(&self, batch: Batch) -> Option<Message> {
        if batch.is_empty() {
            debug!("empty batch ignored");
            return None;
        }
        if let Some(handler) = &self.on_batch {
            return handler(batch).await;
        }

        let mut replies = Batch::new();
        for unit in batch {
            match unit {
                Unit::Request(request) => {
                    if let Some(response) = self.dispatch_request(request).await {
                        replies.push(response);
                    }
                }
                Unit::Response(response) => self.dispatch_response(response),
            }
        }

        if replies.is_empty() {
            None
        } else {
            Some(replies.into())
        }
    }

    async fn dispatch_request(&self, request: Request) -> Option<Response> {
        if let Some(handler) = &self.on_request {
            return handler(request).await;
        }

        if request.is_notification() {
            match &self.on_notification {
                Some(handler) => handler(request).await,
                None => debug!(method = %request.method(), "notification dropped, no handler"),
            }
            return None;
        }

        match &self.on_call {
            Some(handler) => handler(request).await,
            None => {
                debug!(method = %request.method(), "call rejected, no handler");
                let (method, _, id) = request.into_parts();
                Some(Response::failure(
                    id,
                    RpcError::new(ErrorCode::MethodNotFound).with_data("method", method),
                ))
            }
        }
    }

    fn dispatch_response(&self, response: Response) {
        match response.outcome() {
            Outcome::Result(value) => {
                if let Some(handler) = &self.on_result {
                    handler(response.id(), value);
                }
            }
            Outcome::Error(err) => {
                if let Some(handler) = &self.on_error {
                    handler(response.id(), err);
                }
            }
        }
        if let Some(handler) = &self.on_response {
            handler(response);
        }
    }
}
