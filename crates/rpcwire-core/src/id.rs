//! Request identifiers

use crate::{ProtocolError, ProtocolResult};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Identifier correlating a call with its response
///
/// Integer ids stay integers and string ids stay strings across the wire.
/// An absent id is modelled as `Option<Id>::None` by the containing message.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Id {
    Number(i64),
    String(String),
}

impl Id {
    /// Read an optional id from its JSON form
    ///
    /// `null` means absent. Fractional numbers, numbers outside `i64`, and
    /// non-scalar values are rejected.
    pub fn from_value(value: &Value) -> ProtocolResult<Option<Id>> {
        match value {
            Value::Null => Ok(None),
            Value::String(s) => Ok(Some(Id::String(s.clone()))),
            Value::Number(n) => n
                .as_i64()
                .map(|n| Some(Id::Number(n)))
                .ok_or_else(|| ProtocolError::InvalidRequest(format!("unsupported id: {n}"))),
            other => Err(ProtocolError::InvalidRequest(format!(
                "id must be a string, an integer or null, got {other}"
            ))),
        }
    }

    /// JSON form of this id
    pub fn to_value(&self) -> Value {
        match self {
            Id::Number(n) => Value::from(*n),
            Id::String(s) => Value::from(s.clone()),
        }
    }
}

impl fmt::Display for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Id::Number(n) => write!(f, "{n}"),
            Id::String(s) => write!(f, "{s:?}"),
        }
    }
}

impl From<i64> for Id {
    fn from(value: i64) -> Self {
        Id::Number(value)
    }
}

impl From<i32> for Id {
    fn from(value: i32) -> Self {
        Id::Number(value.into())
    }
}

impl From<u32> for Id {
    fn from(value: u32) -> Self {
        Id::Number(value.into())
    }
}

impl From<&str> for Id {
    fn from(value: &str) -> Self {
        Id::String(value.to_string())
    }
}

impl From<String> for Id {
    fn from(value: String) -> Self {
        Id::String(value)
    }
}
