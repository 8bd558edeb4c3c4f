//! Field values carried by documents.
//!
//! # Responsibility
//! - Represent every value shape a document field can hold.
//! - Report the runtime kind and truthiness used by schema validation.
//!
//! # Invariants
//! - `Integer` and `Double` share the `number` kind.
//! - `Bytes` reports the `string` kind; binary payloads travel as encoded text.
//! - Only `Null`, `false`, zero, `NaN`, the empty string and empty bytes are
//!   falsy.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};

/// Unordered field mapping used for raw and validated document bodies.
pub type DocumentData = BTreeMap<String, Value>;

/// Coarse runtime kind of a value.
///
/// `Undefined` is only produced by classifying an unknown type tag and never
/// matches a concrete value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuntimeKind {
    Null,
    Boolean,
    Number,
    String,
    Object,
    Undefined,
}

impl RuntimeKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Boolean => "boolean",
            Self::Number => "number",
            Self::String => "string",
            Self::Object => "object",
            Self::Undefined => "undefined",
        }
    }
}

impl Display for RuntimeKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Geographic point stored as a single field.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

/// One document field value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Value {
    Null,
    Boolean(bool),
    Integer(i64),
    Double(f64),
    Timestamp(DateTime<Utc>),
    String(String),
    Bytes(Vec<u8>),
    /// Slash-separated document path, e.g. `users/alice`.
    Reference(String),
    GeoPoint(GeoPoint),
    Array(Vec<Value>),
    Map(BTreeMap<String, Value>),
}

impl Value {
    /// Returns the kind this value is compared against during validation.
    pub fn kind(&self) -> RuntimeKind {
        match self {
            Self::Null => RuntimeKind::Null,
            Self::Boolean(_) => RuntimeKind::Boolean,
            Self::Integer(_) | Self::Double(_) => RuntimeKind::Number,
            Self::String(_) | Self::Bytes(_) => RuntimeKind::String,
            Self::Timestamp(_)
            | Self::Reference(_)
            | Self::GeoPoint(_)
            | Self::Array(_)
            | Self::Map(_) => RuntimeKind::Object,
        }
    }

    /// Returns whether this value counts as present when its kind mismatches.
    ///
    /// Empty bytes are falsy like the empty string they encode. Empty arrays
    /// and maps stay truthy.
    pub fn is_truthy(&self) -> bool {
        match self {
            Self::Null => false,
            Self::Boolean(value) => *value,
            Self::Integer(value) => *value != 0,
            Self::Double(value) => *value != 0.0 && !value.is_nan(),
            Self::String(value) => !value.is_empty(),
            Self::Bytes(value) => !value.is_empty(),
            Self::Timestamp(_)
            | Self::Reference(_)
            | Self::GeoPoint(_)
            | Self::Array(_)
            | Self::Map(_) => true,
        }
    }

    /// Renders this value as plain JSON for display and CLI output.
    ///
    /// Timestamps become RFC 3339 strings, bytes become arrays of numbers and
    /// geo points become `{latitude, longitude}` objects.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Self::Null => serde_json::Value::Null,
            Self::Boolean(value) => serde_json::Value::Bool(*value),
            Self::Integer(value) => serde_json::Value::from(*value),
            Self::Double(value) => serde_json::Number::from_f64(*value)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
            Self::Timestamp(value) => {
                serde_json::Value::String(value.to_rfc3339_opts(SecondsFormat::Millis, true))
            }
            Self::String(value) | Self::Reference(value) => {
                serde_json::Value::String(value.clone())
            }
            Self::Bytes(value) => serde_json::Value::from(value.clone()),
            Self::GeoPoint(point) => serde_json::json!({
                "latitude": point.latitude,
                "longitude": point.longitude,
            }),
            Self::Array(values) => {
                serde_json::Value::Array(values.iter().map(Value::to_json).collect())
            }
            Self::Map(fields) => serde_json::Value::Object(
                fields
                    .iter()
                    .map(|(key, value)| (key.clone(), value.to_json()))
                    .collect(),
            ),
        }
    }
}

impl From<serde_json::Value> for Value {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => Self::Null,
            serde_json::Value::Bool(value) => Self::Boolean(value),
            serde_json::Value::Number(number) => match number.as_i64() {
                Some(value) => Self::Integer(value),
                // u64 beyond i64::MAX and fractional numbers both land here.
                None => Self::Double(number.as_f64().unwrap_or(f64::NAN)),
            },
            serde_json::Value::String(value) => Self::String(value),
            serde_json::Value::Array(values) => {
                Self::Array(values.into_iter().map(Value::from).collect())
            }
            serde_json::Value::Object(fields) => Self::Map(
                fields
                    .into_iter()
                    .map(|(key, value)| (key, Value::from(value)))
                    .collect(),
            ),
        }
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Self::Boolean(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Self::Double(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(value: DateTime<Utc>) -> Self {
        Self::Timestamp(value)
    }
}

/// Converts a JSON object into document data.
///
/// Returns `None` when `value` is not a JSON object.
pub fn document_from_json(value: serde_json::Value) -> Option<DocumentData> {
    match value {
        serde_json::Value::Object(fields) => Some(
            fields
                .into_iter()
                .map(|(key, value)| (key, Value::from(value)))
                .collect(),
        ),
        _ => None,
    }
}

/// Renders document data as a JSON object.
pub fn document_to_json(data: &DocumentData) -> serde_json::Value {
    serde_json::Value::Object(
        data.iter()
            .map(|(key, value)| (key.clone(), value.to_json()))
            .collect(),
    )
}
