//! Outbound transport callbacks

use crate::codec::{CodecError, SeparatorCodec};
use async_trait::async_trait;
use futures::SinkExt;
use rpcwire_core::Message;
use thiserror::Error;
use tokio::io::AsyncWrite;
use tokio::sync::{Mutex, mpsc};
use tokio_util::codec::FramedWrite;

/// Failure handing a message to the transport
#[derive(Error, Debug)]
pub enum SendError {
    /// The receiving side is gone
    #[error("transport closed")]
    Closed,

    /// The transport rejected or failed to write the message
    #[error("transport error: {0}")]
    Transport(String),
}

impl From<CodecError> for SendError {
    fn from(err: CodecError) -> Self {
        SendError::Transport(err.to_string())
    }
}

/// Destination for outbound messages
///
/// This is the seam to whatever byte stream or channel carries messages to
/// the peer. Implementations must deliver messages in call order.
#[async_trait]
pub trait MessageSink: Send + Sync {
    async fn send(&self, message: Message) -> Result<(), SendError>;
}

/// In-process sink backed by an unbounded channel
#[derive(Debug, Clone)]
pub struct ChannelSink {
    sender: mpsc::UnboundedSender<Message>,
}

impl ChannelSink {
    /// Create a sink and the receiver draining it
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<Message>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (Self { sender }, receiver)
    }

    pub fn new(sender: mpsc::UnboundedSender<Message>) -> Self {
        Self { sender }
    }
}

#[async_trait]
impl MessageSink for ChannelSink {
    async fn send(&self, message: Message) -> Result<(), SendError> {
        self.sender.send(message).map_err(|_| SendError::Closed)
    }
}

/// Sink that frames messages onto any async byte stream
pub struct FramedSink<W> {
    inner: Mutex<FramedWrite<W, SeparatorCodec>>,
}

impl<W: AsyncWrite + Unpin + Send> FramedSink<W> {
    pub fn new(writer: W, codec: SeparatorCodec) -> Self {
        Self {
            inner: Mutex::new(FramedWrite::new(writer, codec)),
        }
    }
}

#[async_trait]
impl<W: AsyncWrite + Unpin + Send> MessageSink for FramedSink<W> {
    async fn send(&self, message: Message) -> Result<(), SendError> {
        let mut framed = self.inner.lock().await;
        framed.send(message).await.map_err(SendError::from)
    }
}
