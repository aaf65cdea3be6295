//! rpcwire-core - JSON-RPC 2.0 message model and error taxonomy
//!
//! This crate provides the value types every other rpcwire crate speaks:
//! - [`Request`], [`Response`], [`Batch`] and the [`Unit`]/[`Message`] sum types
//! - [`Id`] and [`Params`] for the dynamic parts of a request
//! - [`RpcError`] (the wire error object) and [`ErrorCode`] (reserved codes)
//! - [`ProtocolError`] for malformed input and [`MethodError`] for handler failures
//! - [`RpcConfig`] for framing and registry configuration

mod config;
mod error;
mod id;
mod message;
mod params;

pub use config::{DEFAULT_SEPARATOR, RpcConfig};
pub use error::{ErrorCode, MethodError, ProtocolError, ProtocolResult, RpcError};
pub use id::Id;
pub use message::{Batch, JSONRPC_VERSION, Message, Outcome, Request, Response, Unit};
pub use params::Params;

/// Log levels understood by [`RpcConfig::log_level`]
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    Trace = 0,
    Debug = 1,
    Info = 2,
    Warn = 3,
    Error = 4,
    Off = 5,
}

impl LogLevel {
    pub fn from_u8(value: u8) -> Self {
        match value {
            0 => LogLevel::Trace,
            1 => LogLevel::Debug,
            2 => LogLevel::Info,
            3 => LogLevel::Warn,
            4 => LogLevel::Error,
            _ => LogLevel::Off,
        }
    }

    /// Directive string accepted by `tracing_subscriber::EnvFilter`
    pub fn as_filter(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
            LogLevel::Off => "off",
        }
    }
}

impl std::str::FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "trace" => Ok(LogLevel::Trace),
            "debug" => Ok(LogLevel::Debug),
            "info" => Ok(LogLevel::Info),
            "warn" | "warning" => Ok(LogLevel::Warn),
            "error" => Ok(LogLevel::Error),
            "off" => Ok(LogLevel::Off),
            other => Err(format!("unknown log level: {other}")),
        }
    }
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LogLevel::Trace => write!(f, "TRACE"),
            LogLevel::Debug => write!(f, "DEBUG"),
            LogLevel::Info => write!(f, "INFO"),
            LogLevel::Warn => write!(f, "WARN"),
            LogLevel::Error => write!(f, "ERROR"),
            LogLevel::Off => write!(f, "OFF"),
        }
    }
}

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        Batch, ErrorCode, Id, LogLevel, Message, MethodError, Params, ProtocolError,
        ProtocolResult, Request, Response, RpcConfig, RpcError, Unit,
    };
}

#[cfg(test)]
mod lib_tests;
