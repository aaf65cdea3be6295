//! Error types for the JSON-RPC message layer

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use thiserror::Error;

/// Result type alias for message-model operations
pub type ProtocolResult<T> = Result<T, ProtocolError>;

static NULL: Value = Value::Null;

/// Reserved JSON-RPC 2.0 error codes
///
/// The integers are fixed by the protocol and must not change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    ParseError,
    InvalidRequest,
    MethodNotFound,
    InvalidParams,
    InternalError,
}

impl ErrorCode {
    /// Wire integer for this code
    pub fn code(self) -> i64 {
        match self {
            ErrorCode::ParseError => -32700,
            ErrorCode::InvalidRequest => -32600,
            ErrorCode::MethodNotFound => -32601,
            ErrorCode::InvalidParams => -32602,
            ErrorCode::InternalError => -32603,
        }
    }

    /// Default human-readable message for this code
    pub fn message(self) -> &'static str {
        match self {
            ErrorCode::ParseError => "Parse error",
            ErrorCode::InvalidRequest => "Invalid Request",
            ErrorCode::MethodNotFound => "Method not found",
            ErrorCode::InvalidParams => "Invalid params",
            ErrorCode::InternalError => "Internal error",
        }
    }

    /// Map a wire integer back to a reserved code
    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            -32700 => Some(ErrorCode::ParseError),
            -32600 => Some(ErrorCode::InvalidRequest),
            -32601 => Some(ErrorCode::MethodNotFound),
            -32602 => Some(ErrorCode::InvalidParams),
            -32603 => Some(ErrorCode::InternalError),
            _ => None,
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.message(), self.code())
    }
}

/// JSON-RPC error object carried inside an error response
///
/// `data` is always a mapping. It is empty when the peer sent none, so
/// lookups through [`RpcError::data_field`] never fail.
#[derive(Error, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[error("{message} ({code})")]
pub struct RpcError {
    /// Error type indicator
    pub code: i64,

    /// Short error description
    pub message: String,

    /// Diagnostic payload
    #[serde(default, deserialize_with = "deserialize_data")]
    pub data: Map<String, Value>,
}

impl RpcError {
    /// Create an error for a reserved code with its default message
    pub fn new(code: ErrorCode) -> Self {
        Self {
            code: code.code(),
            message: code.message().to_string(),
            data: Map::new(),
        }
    }

    /// Create an application-defined error
    pub fn custom(code: i64, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            data: Map::new(),
        }
    }

    /// Attach a diagnostic entry
    pub fn with_data(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.data.insert(key.into(), value.into());
        self
    }

    /// Reserved code this error carries, if any
    pub fn kind(&self) -> Option<ErrorCode> {
        ErrorCode::from_code(self.code)
    }

    /// Check whether this error carries the given reserved code
    pub fn is(&self, code: ErrorCode) -> bool {
        self.code == code.code()
    }

    /// Look up a diagnostic entry, yielding `null` when absent
    pub fn data_field(&self, key: &str) -> &Value {
        self.data.get(key).unwrap_or(&NULL)
    }

    /// Canonical mapping form
    pub fn to_value(&self) -> Value {
        let mut map = Map::new();
        map.insert("code".into(), Value::from(self.code));
        map.insert("message".into(), Value::from(self.message.clone()));
        map.insert("data".into(), Value::Object(self.data.clone()));
        Value::Object(map)
    }
}

impl From<ErrorCode> for RpcError {
    fn from(code: ErrorCode) -> Self {
        RpcError::new(code)
    }
}

// Peers may send any JSON as `data`; non-mappings are kept under "value".
fn deserialize_data<'de, D>(deserializer: D) -> Result<Map<String, Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Null => Map::new(),
        Value::Object(map) => map,
        other => {
            let mut map = Map::new();
            map.insert("value".into(), other);
            map
        }
    })
}

/// Malformed or unparseable protocol input
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ProtocolError {
    /// Bytes were not valid JSON
    #[error("parse error: {0}")]
    Parse(String),

    /// Valid JSON that is not a valid JSON-RPC unit
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// `params` was present but neither a sequence nor a mapping
    #[error("invalid params: {0}")]
    InvalidParams(String),

    /// A response carried both `result` and `error`
    #[error("response carries both a result and an error")]
    ConflictingOutcome,
}

impl ProtocolError {
    /// Reserved code reported to the peer for this failure
    pub fn error_code(&self) -> ErrorCode {
        match self {
            ProtocolError::Parse(_) => ErrorCode::ParseError,
            ProtocolError::InvalidRequest(_) | ProtocolError::ConflictingOutcome => {
                ErrorCode::InvalidRequest
            }
            ProtocolError::InvalidParams(_) => ErrorCode::InvalidParams,
        }
    }

    /// Wire error object describing this failure
    pub fn to_rpc_error(&self) -> RpcError {
        RpcError::new(self.error_code()).with_data("detail", self.to_string())
    }
}

impl From<serde_json::Error> for ProtocolError {
    fn from(err: serde_json::Error) -> Self {
        if err.is_data() {
            ProtocolError::InvalidRequest(err.to_string())
        } else {
            ProtocolError::Parse(err.to_string())
        }
    }
}

/// Failure returned by a method handler
///
/// `Rpc` errors reach the peer verbatim. Everything else is reported as
/// `InternalError` with the message and trace attached as data.
#[derive(Error, Debug)]
pub enum MethodError {
    #[error(transparent)]
    Rpc(RpcError),

    #[error("{message}")]
    Failed { message: String, trace: String },
}

impl MethodError {
    /// Wrap any displayable failure, keeping its debug rendering as the trace
    pub fn failed<E: fmt::Display + fmt::Debug>(err: E) -> Self {
        MethodError::Failed {
            message: err.to_string(),
            trace: format!("{err:?}"),
        }
    }

    /// Plain failure with a message and no further trace
    pub fn msg(message: impl Into<String>) -> Self {
        let message = message.into();
        MethodError::Failed {
            trace: message.clone(),
            message,
        }
    }

    /// Reject the call's params with the reserved `InvalidParams` code
    pub fn invalid_params(detail: impl Into<String>) -> Self {
        let detail: String = detail.into();
        MethodError::Rpc(RpcError::new(ErrorCode::InvalidParams).with_data("detail", detail))
    }
}

impl From<RpcError> for MethodError {
    fn from(err: RpcError) -> Self {
        MethodError::Rpc(err)
    }
}

impl From<ErrorCode> for MethodError {
    fn from(code: ErrorCode) -> Self {
        MethodError::Rpc(RpcError::new(code))
    }
}

impl From<ProtocolError> for MethodError {
    fn from(err: ProtocolError) -> Self {
        MethodError::Rpc(err.to_rpc_error())
    }
}

impl From<serde_json::Error> for MethodError {
    fn from(err: serde_json::Error) -> Self {
        MethodError::failed(err)
    }
}

impl From<anyhow::Error> for MethodError {
    fn from(err: anyhow::Error) -> Self {
        MethodError::Failed {
            message: err.to_string(),
            trace: format!("{err:?}"),
        }
    }
}


#[cfg(test)]
#[path = "error/error_parameterized_tests.rs"]
mod error_parameterized_tests;
