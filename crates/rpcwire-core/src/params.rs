//! Request parameters

use crate::{ProtocolError, ProtocolResult};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Parameters of a request: an ordered sequence or a string-keyed mapping
///
/// No other shape is representable, so a constructed [`crate::Request`]
/// always satisfies the protocol's params rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Params {
    Array(Vec<Value>),
    Object(Map<String, Value>),
}

impl Params {
    /// Read optional params from their JSON form
    ///
    /// `null` is treated as absent; scalars are rejected.
    pub fn from_value(value: Value) -> ProtocolResult<Option<Params>> {
        match value {
            Value::Null => Ok(None),
            Value::Array(items) => Ok(Some(Params::Array(items))),
            Value::Object(map) => Ok(Some(Params::Object(map))),
            other => Err(ProtocolError::InvalidParams(format!(
                "params must be an array or an object, got {other}"
            ))),
        }
    }

    /// JSON form of these params
    pub fn to_value(&self) -> Value {
        match self {
            Params::Array(items) => Value::Array(items.clone()),
            Params::Object(map) => Value::Object(map.clone()),
        }
    }

    pub fn into_value(self) -> Value {
        match self {
            Params::Array(items) => Value::Array(items),
            Params::Object(map) => Value::Object(map),
        }
    }

    /// Deserialize the params into a typed value
    ///
    /// Arrays map onto tuples and sequences, objects onto structs and maps.
    pub fn parse<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_value(self.to_value())
    }

    /// Positional parameter
    pub fn get_index(&self, index: usize) -> Option<&Value> {
        match self {
            Params::Array(items) => items.get(index),
            Params::Object(_) => None,
        }
    }

    /// Named parameter
    pub fn get_key(&self, key: &str) -> Option<&Value> {
        match self {
            Params::Array(_) => None,
            Params::Object(map) => map.get(key),
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Params::Array(items) => items.len(),
            Params::Object(map) => map.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl From<Vec<Value>> for Params {
    fn from(items: Vec<Value>) -> Self {
        Params::Array(items)
    }
}

impl From<Map<String, Value>> for Params {
    fn from(map: Map<String, Value>) -> Self {
        Params::Object(map)
    }
}

impl TryFrom<Value> for Params {
    type Error = ProtocolError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        Params::from_value(value)?
            .ok_or_else(|| ProtocolError::InvalidParams("params must not be null".to_string()))
    }
}
