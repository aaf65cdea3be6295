//! Separator-delimited framing for JSON-RPC messages
//!
//! Every frame is the JSON text of one message followed by a literal
//! separator token. The separator must never appear unescaped inside the
//! payload, so callers pick a sentinel unlikely to occur in JSON content.

use bytes::{Buf, BufMut, BytesMut};
use rpcwire_core::{DEFAULT_SEPARATOR, Message, ProtocolError, ProtocolResult, RpcConfig, Unit};
use thiserror::Error;
use tokio_util::codec::{Decoder, Encoder};
use tracing::trace;

/// Errors that can occur during encoding/decoding
#[derive(Error, Debug)]
pub enum CodecError {
    #[error("serialization error: {0}")]
    Serialization(String),

    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    #[error("frame of {size} bytes exceeds limit of {limit} bytes")]
    FrameTooLarge { size: usize, limit: usize },

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<serde_json::Error> for CodecError {
    fn from(err: serde_json::Error) -> Self {
        if err.is_data() || err.is_syntax() || err.is_eof() {
            CodecError::Protocol(err.into())
        } else {
            CodecError::Serialization(err.to_string())
        }
    }
}

/// Outcome of decoding one frame
///
/// A malformed frame is reported in place so the stream can continue.
pub type Frame = ProtocolResult<Message>;

/// Encode a message as JSON text followed by `postfix`
pub fn encode(message: &Message, postfix: &str) -> Result<Vec<u8>, CodecError> {
    let mut out = serde_json::to_vec(&message.to_value())?;
    out.extend_from_slice(postfix.as_bytes());
    Ok(out)
}

/// Decode every frame in `data`
///
/// Chunks between separators are parsed independently; blank chunks
/// (including the one after a trailing separator) are skipped. Objects
/// contribute one unit and arrays one unit per element. Exactly one unit
/// overall is returned as itself, anything else as a batch.
pub fn decode(data: &[u8], separator: &str) -> ProtocolResult<Message> {
    let mut units = Vec::new();
    for chunk in split_frames(data, separator.as_bytes()) {
        if is_blank(chunk) {
            continue;
        }
        units.extend(decode_units(chunk)?);
    }
    Ok(Message::from_units(units))
}

/// Decode a single frame body (no separator)
pub fn decode_frame(chunk: &[u8]) -> Frame {
    decode_units(chunk).map(Message::from_units)
}

fn decode_units(chunk: &[u8]) -> ProtocolResult<Vec<Unit>> {
    let value: serde_json::Value =
        serde_json::from_slice(chunk).map_err(|e| ProtocolError::Parse(e.to_string()))?;
    Message::units_from_value(value)
}

fn split_frames<'a>(data: &'a [u8], separator: &'a [u8]) -> impl Iterator<Item = &'a [u8]> + 'a {
    let mut rest = Some(data);
    std::iter::from_fn(move || {
        let current = rest?;
        match find(current, separator, 0) {
            Some(pos) => {
                rest = Some(&current[pos + separator.len()..]);
                Some(&current[..pos])
            }
            None => {
                rest = None;
                Some(current)
            }
        }
    })
}

fn find(haystack: &[u8], needle: &[u8], from: usize) -> Option<usize> {
    if needle.is_empty() || haystack.len() < from + needle.len() {
        return None;
    }
    haystack[from..]
        .windows(needle.len())
        .position(|window| window == needle)
        .map(|pos| pos + from)
}

fn is_blank(chunk: &[u8]) -> bool {
    chunk.iter().all(u8::is_ascii_whitespace)
}

/// JSON codec framing messages with a literal separator
///
/// Also usable as a streaming [`Decoder`]/[`Encoder`] over any byte stream.
#[derive(Debug, Clone)]
pub struct SeparatorCodec {
    separator: String,
    max_frame_bytes: usize,
    /// Whether to pretty-print output (default: false for efficiency)
    pretty: bool,
    /// Bytes already searched for a separator in the current buffer
    scanned: usize,
}

impl SeparatorCodec {
    /// Create a codec using the given separator
    pub fn new(separator: impl Into<String>) -> Self {
        let defaults = RpcConfig::default();
        Self {
            separator: separator.into(),
            max_frame_bytes: defaults.max_frame_bytes,
            pretty: false,
            scanned: 0,
        }
    }

    /// Create a codec from configuration
    pub fn from_config(config: &RpcConfig) -> Self {
        Self {
            separator: config.separator.clone(),
            max_frame_bytes: config.max_frame_bytes,
            pretty: config.pretty,
            scanned: 0,
        }
    }

    /// Set the largest frame the streaming decoder will buffer
    pub fn with_max_frame_bytes(mut self, max: usize) -> Self {
        self.max_frame_bytes = max;
        self
    }

    /// Pretty-print encoded output
    pub fn pretty(mut self) -> Self {
        self.pretty = true;
        self
    }

    pub fn separator(&self) -> &str {
        &self.separator
    }

    /// Encode a message directly to a framed string
    pub fn encode_string(&self, message: &Message) -> Result<String, CodecError> {
        let value = message.to_value();
        let mut text = if self.pretty {
            serde_json::to_string_pretty(&value)?
        } else {
            serde_json::to_string(&value)?
        };
        text.push_str(&self.separator);
        Ok(text)
    }

    /// Encode a message to one framed buffer
    pub fn encode_bytes(&self, message: &Message) -> Result<Vec<u8>, CodecError> {
        self.encode_string(message).map(String::into_bytes)
    }

    /// Decode a buffer holding any number of frames
    pub fn decode_bytes(&self, data: &[u8]) -> Result<Message, CodecError> {
        decode(data, &self.separator).map_err(Into::into)
    }
}

impl Default for SeparatorCodec {
    fn default() -> Self {
        Self::new(DEFAULT_SEPARATOR)
    }
}

impl Decoder for SeparatorCodec {
    type Item = Frame;
    type Error = CodecError;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        let separator = self.separator.as_bytes();
        loop {
            match find(src, separator, self.scanned) {
                Some(pos) if pos > self.max_frame_bytes => {
                    return Err(CodecError::FrameTooLarge {
                        size: pos,
                        limit: self.max_frame_bytes,
                    });
                }
                Some(pos) => {
                    let chunk = src.split_to(pos);
                    src.advance(separator.len());
                    self.scanned = 0;
                    if is_blank(&chunk) {
                        continue;
                    }
                    trace!("decoded frame of {} bytes", chunk.len());
                    return Ok(Some(decode_frame(&chunk)));
                }
                None => {
                    if src.len() > self.max_frame_bytes {
                        return Err(CodecError::FrameTooLarge {
                            size: src.len(),
                            limit: self.max_frame_bytes,
                        });
                    }
                    // A separator may straddle the boundary of the next read.
                    self.scanned = src.len().saturating_sub(separator.len().saturating_sub(1));
                    return Ok(None);
                }
            }
        }
    }

    fn decode_eof(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        if let Some(frame) = Decoder::decode(self, src)? {
            return Ok(Some(frame));
        }
        self.scanned = 0;
        let chunk = src.split();
        if is_blank(&chunk) {
            return Ok(None);
        }
        Ok(Some(decode_frame(&chunk)))
    }
}

impl Encoder<Message> for SeparatorCodec {
    type Error = CodecError;

    fn encode(&mut self, item: Message, dst: &mut BytesMut) -> Result<(), Self::Error> {
        let text = self.encode_string(&item)?;
        dst.reserve(text.len());
        dst.put_slice(text.as_bytes());
        Ok(())
    }
}
