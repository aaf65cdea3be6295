//! Framing and registry configuration

use crate::LogLevel;
use serde::{Deserialize, Serialize};

/// Default frame separator
///
/// A multi-character sentinel rather than a newline, so pretty-printed JSON
/// and newline-bearing transports do not collide with it.
pub const DEFAULT_SEPARATOR: &str = "<EOM>";

/// Configuration shared by codecs, registries and the CLI
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RpcConfig {
    /// Literal token terminating every frame on the wire; never empty
    #[serde(default = "default_separator")]
    pub separator: String,

    /// Namespace prefix applied to every registered method name
    #[serde(default)]
    pub method_prefix: String,

    /// Largest frame the streaming decoder accepts, in bytes
    #[serde(default = "default_max_frame_bytes")]
    pub max_frame_bytes: usize,

    /// Initial log level
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Pretty-print encoded JSON (debugging only)
    #[serde(default)]
    pub pretty: bool,
}

fn default_separator() -> String {
    DEFAULT_SEPARATOR.to_string()
}

fn default_max_frame_bytes() -> usize {
    16 * 1024 * 1024
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for RpcConfig {
    fn default() -> Self {
        Self {
            separator: default_separator(),
            method_prefix: String::new(),
            max_frame_bytes: default_max_frame_bytes(),
            log_level: default_log_level(),
            pretty: false,
        }
    }
}

impl RpcConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create configuration from JSON bytes; empty input yields defaults
    pub fn from_json(bytes: &[u8]) -> Result<Self, serde_json::Error> {
        if bytes.is_empty() {
            return Ok(Self::default());
        }
        serde_json::from_slice(bytes)
    }

    /// Create configuration from a TOML document
    pub fn from_toml(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(text)
    }

    /// Set the frame separator; it must not be empty
    pub fn with_separator(mut self, separator: impl Into<String>) -> Self {
        self.separator = separator.into();
        self
    }

    pub fn with_method_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.method_prefix = prefix.into();
        self
    }

    pub fn with_max_frame_bytes(mut self, max: usize) -> Self {
        self.max_frame_bytes = max;
        self
    }

    /// Parsed log level; unknown names fall back to `Info`
    pub fn level(&self) -> LogLevel {
        self.log_level.parse().unwrap_or(LogLevel::Info)
    }
}
