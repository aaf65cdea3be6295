//! rpcwire-transport - Separator framing and transport sinks
//!
//! This crate provides:
//! - [`encode`] and [`decode`] for whole buffers of separator-delimited frames
//! - [`SeparatorCodec`], a whole-buffer codec that also works as a streaming
//!   `tokio_util` decoder/encoder
//! - [`MessageSink`], the outbound transport seam, with [`ChannelSink`] and
//!   [`FramedSink`] implementations

mod codec;
mod sink;

pub use codec::{CodecError, Frame, SeparatorCodec, decode, decode_frame, encode};
pub use sink::{ChannelSink, FramedSink, MessageSink, SendError};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        ChannelSink, CodecError, FramedSink, MessageSink, SendError, SeparatorCodec,
        decode, encode,
    };
}
