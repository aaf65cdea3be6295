//! Request, response and batch value types
//!
//! Every type here converts to and from its canonical mapping form
//! (`serde_json::Value`). The wire encoding in `rpcwire-transport` is built on
//! top of that form.

use crate::{Id, Params, ProtocolError, ProtocolResult, RpcError};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};

/// Protocol version marker required on every unit
pub const JSONRPC_VERSION: &str = "2.0";

/// JSON-RPC request
///
/// A request with an id is a call and expects exactly one response with the
/// same id. A request without an id is a notification and never gets one.
#[derive(Debug, Clone, PartialEq)]
pub struct Request {
    method: String,
    params: Option<Params>,
    id: Option<Id>,
}

impl Request {
    pub fn new(method: impl Into<String>, params: Option<Params>, id: Option<Id>) -> Self {
        Self {
            method: method.into(),
            params,
            id,
        }
    }

    /// Create a call expecting a response under `id`
    pub fn call(method: impl Into<String>, params: Option<Params>, id: impl Into<Id>) -> Self {
        Self::new(method, params, Some(id.into()))
    }

    /// Create a fire-and-forget notification
    pub fn notification(method: impl Into<String>, params: Option<Params>) -> Self {
        Self::new(method, params, None)
    }

    pub fn method(&self) -> &str {
        &self.method
    }

    pub fn params(&self) -> Option<&Params> {
        self.params.as_ref()
    }

    pub fn id(&self) -> Option<&Id> {
        self.id.as_ref()
    }

    /// Check if this is a notification (no id)
    pub fn is_notification(&self) -> bool {
        self.id.is_none()
    }

    pub fn into_parts(self) -> (String, Option<Params>, Option<Id>) {
        (self.method, self.params, self.id)
    }

    /// Canonical mapping form; notifications omit the `id` key
    pub fn to_value(&self) -> Value {
        let mut map = Map::new();
        map.insert("jsonrpc".into(), Value::from(JSONRPC_VERSION));
        map.insert("method".into(), Value::from(self.method.clone()));
        if let Some(params) = &self.params {
            map.insert("params".into(), params.to_value());
        }
        if let Some(id) = &self.id {
            map.insert("id".into(), id.to_value());
        }
        Value::Object(map)
    }

    fn from_map(mut map: Map<String, Value>) -> ProtocolResult<Self> {
        let method = match map.remove("method") {
            Some(Value::String(method)) => method,
            Some(other) => {
                return Err(ProtocolError::InvalidRequest(format!(
                    "method must be a string, got {other}"
                )));
            }
            None => return Err(ProtocolError::InvalidRequest("missing method".to_string())),
        };
        let params = Params::from_value(map.remove("params").unwrap_or(Value::Null))?;
        let id = Id::from_value(map.get("id").unwrap_or(&Value::Null))?;

        Ok(Self { method, params, id })
    }
}

/// Content of a response: a result or an error, never both
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Result(Value),
    Error(RpcError),
}

/// JSON-RPC response
#[derive(Debug, Clone, PartialEq)]
pub struct Response {
    id: Option<Id>,
    outcome: Outcome,
}

impl Response {
    /// Create a response from optional parts
    ///
    /// Supplying both a result and an error is rejected. Supplying neither
    /// yields a `null` result, the normal reply for handlers with no value.
    pub fn new(
        id: Option<Id>,
        result: Option<Value>,
        error: Option<RpcError>,
    ) -> ProtocolResult<Self> {
        let outcome = match (result, error) {
            (Some(_), Some(_)) => return Err(ProtocolError::ConflictingOutcome),
            (_, Some(error)) => Outcome::Error(error),
            (result, None) => Outcome::Result(result.unwrap_or(Value::Null)),
        };
        Ok(Self { id, outcome })
    }

    /// Create a success response
    pub fn success(id: impl Into<Option<Id>>, result: Value) -> Self {
        Self {
            id: id.into(),
            outcome: Outcome::Result(result),
        }
    }

    /// Create an error response
    pub fn failure(id: impl Into<Option<Id>>, error: RpcError) -> Self {
        Self {
            id: id.into(),
            outcome: Outcome::Error(error),
        }
    }

    pub fn id(&self) -> Option<&Id> {
        self.id.as_ref()
    }

    pub fn outcome(&self) -> &Outcome {
        &self.outcome
    }

    /// True when the response carries a non-null result
    pub fn has_result(&self) -> bool {
        matches!(&self.outcome, Outcome::Result(value) if !value.is_null())
    }

    pub fn has_error(&self) -> bool {
        matches!(self.outcome, Outcome::Error(_))
    }

    /// Result value, `Some(Value::Null)` for a valueless success
    pub fn result(&self) -> Option<&Value> {
        match &self.outcome {
            Outcome::Result(value) => Some(value),
            Outcome::Error(_) => None,
        }
    }

    pub fn error(&self) -> Option<&RpcError> {
        match &self.outcome {
            Outcome::Result(_) => None,
            Outcome::Error(error) => Some(error),
        }
    }

    pub fn into_result(self) -> Result<Value, RpcError> {
        match self.outcome {
            Outcome::Result(value) => Ok(value),
            Outcome::Error(error) => Err(error),
        }
    }

    /// Canonical mapping form; both `result` and `error` are always present
    pub fn to_value(&self) -> Value {
        let mut map = Map::new();
        map.insert("jsonrpc".into(), Value::from(JSONRPC_VERSION));
        map.insert(
            "id".into(),
            self.id.as_ref().map(Id::to_value).unwrap_or(Value::Null),
        );
        let (result, error) = match &self.outcome {
            Outcome::Result(value) => (value.clone(), Value::Null),
            Outcome::Error(error) => (Value::Null, error.to_value()),
        };
        map.insert("result".into(), result);
        map.insert("error".into(), error);
        Value::Object(map)
    }

    fn from_map(mut map: Map<String, Value>) -> ProtocolResult<Self> {
        let id = Id::from_value(map.get("id").unwrap_or(&Value::Null))?;
        let result = map.remove("result").filter(|v| !v.is_null());
        let error = match map.remove("error") {
            None | Some(Value::Null) => None,
            Some(value @ Value::Object(_)) => Some(serde_json::from_value::<RpcError>(value)?),
            Some(other) => {
                return Err(ProtocolError::InvalidRequest(format!(
                    "error must be an object, got {other}"
                )));
            }
        };
        Self::new(id, result, error)
    }
}

/// A single JSON-RPC unit: the element type of a batch
#[derive(Debug, Clone, PartialEq)]
pub enum Unit {
    Request(Request),
    Response(Response),
}

impl Unit {
    /// Build a unit from its mapping form
    ///
    /// A `method` key makes it a request, its absence a response. The
    /// `jsonrpc` marker must equal `"2.0"`.
    pub fn from_value(value: Value) -> ProtocolResult<Self> {
        let map = match value {
            Value::Object(map) => map,
            other => {
                return Err(ProtocolError::InvalidRequest(format!(
                    "expected an object, got {}",
                    kind_of(&other)
                )));
            }
        };
        match map.get("jsonrpc") {
            Some(Value::String(version)) if version == JSONRPC_VERSION => {}
            Some(other) => {
                return Err(ProtocolError::InvalidRequest(format!(
                    "unsupported jsonrpc version: {other}"
                )));
            }
            None => {
                return Err(ProtocolError::InvalidRequest(
                    "missing jsonrpc version marker".to_string(),
                ));
            }
        }
        if map.contains_key("method") {
            Request::from_map(map).map(Unit::Request)
        } else {
            Response::from_map(map).map(Unit::Response)
        }
    }

    pub fn to_value(&self) -> Value {
        match self {
            Unit::Request(request) => request.to_value(),
            Unit::Response(response) => response.to_value(),
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Unit::Request(request) if request.is_notification() => "notification",
            Unit::Request(_) => "call",
            Unit::Response(_) => "response",
        }
    }
}

/// Ordered sequence of units; batches never nest
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Batch(Vec<Unit>);

impl Batch {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    pub fn push(&mut self, unit: impl Into<Unit>) {
        self.0.push(unit.into());
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Unit> {
        self.0.iter()
    }

    pub fn units(&self) -> &[Unit] {
        &self.0
    }

    pub fn into_units(self) -> Vec<Unit> {
        self.0
    }

    pub fn to_value(&self) -> Value {
        Value::Array(self.0.iter().map(Unit::to_value).collect())
    }
}

impl From<Vec<Unit>> for Batch {
    fn from(units: Vec<Unit>) -> Self {
        Self(units)
    }
}

impl FromIterator<Unit> for Batch {
    fn from_iter<I: IntoIterator<Item = Unit>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl IntoIterator for Batch {
    type Item = Unit;
    type IntoIter = std::vec::IntoIter<Unit>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a Batch {
    type Item = &'a Unit;
    type IntoIter = std::slice::Iter<'a, Unit>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Anything that can travel as one frame: a single unit or a batch
#[derive(Debug, Clone, PartialEq)]
pub enum Message {
    Request(Request),
    Response(Response),
    Batch(Batch),
}

impl Message {
    /// Collapse decoded units: exactly one unit stays single, anything else
    /// (including zero) becomes a batch
    pub fn from_units(mut units: Vec<Unit>) -> Self {
        if units.len() == 1
            && let Some(unit) = units.pop()
        {
            return unit.into();
        }
        Message::Batch(Batch(units))
    }

    /// Units carried by one JSON value: an object yields one, an array yields
    /// one per element
    pub fn units_from_value(value: Value) -> ProtocolResult<Vec<Unit>> {
        match value {
            Value::Array(items) => items.into_iter().map(Unit::from_value).collect(),
            value @ Value::Object(_) => Ok(vec![Unit::from_value(value)?]),
            other => Err(ProtocolError::InvalidRequest(format!(
                "expected an object or an array, got {}",
                kind_of(&other)
            ))),
        }
    }

    pub fn from_value(value: Value) -> ProtocolResult<Self> {
        Ok(Self::from_units(Self::units_from_value(value)?))
    }

    pub fn to_value(&self) -> Value {
        match self {
            Message::Request(request) => request.to_value(),
            Message::Response(response) => response.to_value(),
            Message::Batch(batch) => batch.to_value(),
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Message::Request(request) if request.is_notification() => "notification",
            Message::Request(_) => "call",
            Message::Response(_) => "response",
            Message::Batch(_) => "batch",
        }
    }
}

impl From<Unit> for Message {
    fn from(unit: Unit) -> Self {
        match unit {
            Unit::Request(request) => Message::Request(request),
            Unit::Response(response) => Message::Response(response),
        }
    }
}

impl From<Request> for Unit {
    fn from(request: Request) -> Self {
        Unit::Request(request)
    }
}

impl From<Response> for Unit {
    fn from(response: Response) -> Self {
        Unit::Response(response)
    }
}

impl From<Request> for Message {
    fn from(request: Request) -> Self {
        Message::Request(request)
    }
}

impl From<Response> for Message {
    fn from(response: Response) -> Self {
        Message::Response(response)
    }
}

impl From<Batch> for Message {
    fn from(batch: Batch) -> Self {
        Message::Batch(batch)
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

macro_rules! impl_serde_via_value {
    ($($ty:ty),*) => {$(
        impl Serialize for $ty {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                self.to_value().serialize(serializer)
            }
        }
    )*};
}

impl_serde_via_value!(Request, Response, Unit, Batch, Message);

impl<'de> Deserialize<'de> for Unit {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Unit::from_value(Value::deserialize(deserializer)?).map_err(serde::de::Error::custom)
    }
}

impl<'de> Deserialize<'de> for Message {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Message::from_value(Value::deserialize(deserializer)?).map_err(serde::de::Error::custom)
    }
}
