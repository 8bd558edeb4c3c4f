//! Declared document types.
//!
//! # Responsibility
//! - Parse type tags from schema declarations.
//! - Map every tag to the runtime kind values are checked against.
//!
//! # Invariants
//! - `classify` is total; unknown tags map to `RuntimeKind::Undefined`.
//! - Field names in a schema are unique.

use crate::model::value::RuntimeKind;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Expected type of one schema field.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeTag {
    Null,
    Boolean,
    Integer,
    Double,
    /// Generic numeric tag; accepts integers and doubles alike.
    Number,
    Timestamp,
    String,
    Bytes,
    Reference,
    GeoPoint,
    Array,
    Map,
    /// Unrecognized tag, kept verbatim for diagnostics.
    Unknown(String),
}

impl TypeTag {
    /// Parses a tag name.
    ///
    /// Accepts the short spelling (`string`) and the `<tag>Value` spelling
    /// (`stringValue`). Unrecognized names become `TypeTag::Unknown`.
    pub fn parse(name: &str) -> Self {
        let trimmed = name.trim();
        let base = trimmed.strip_suffix("Value").unwrap_or(trimmed);
        match base {
            "null" => Self::Null,
            "boolean" => Self::Boolean,
            "integer" => Self::Integer,
            "double" => Self::Double,
            "number" => Self::Number,
            "timestamp" => Self::Timestamp,
            "string" => Self::String,
            "bytes" => Self::Bytes,
            "reference" => Self::Reference,
            "geoPoint" => Self::GeoPoint,
            "array" => Self::Array,
            "map" => Self::Map,
            _ => Self::Unknown(trimmed.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Null => "null",
            Self::Boolean => "boolean",
            Self::Integer => "integer",
            Self::Double => "double",
            Self::Number => "number",
            Self::Timestamp => "timestamp",
            Self::String => "string",
            Self::Bytes => "bytes",
            Self::Reference => "reference",
            Self::GeoPoint => "geoPoint",
            Self::Array => "array",
            Self::Map => "map",
            Self::Unknown(name) => name.as_str(),
        }
    }
}

impl Display for TypeTag {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for TypeTag {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for TypeTag {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        Ok(Self::parse(&name))
    }
}

/// Maps a type tag to the runtime kind a matching value must have.
pub fn classify(tag: &TypeTag) -> RuntimeKind {
    match tag {
        TypeTag::Null => RuntimeKind::Null,
        TypeTag::Boolean => RuntimeKind::Boolean,
        TypeTag::Integer | TypeTag::Double | TypeTag::Number => RuntimeKind::Number,
        TypeTag::String | TypeTag::Bytes => RuntimeKind::String,
        TypeTag::Timestamp
        | TypeTag::Reference
        | TypeTag::GeoPoint
        | TypeTag::Array
        | TypeTag::Map => RuntimeKind::Object,
        TypeTag::Unknown(_) => RuntimeKind::Undefined,
    }
}

/// Schema loading errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchemaError {
    Parse(String),
    NotAnObject,
    NonStringTag { field: String },
    EmptyFieldName,
}

impl Display for SchemaError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Parse(message) => write!(f, "schema is not valid JSON: {message}"),
            Self::NotAnObject => write!(f, "schema must be a JSON object"),
            Self::NonStringTag { field } => {
                write!(f, "type tag for field `{field}` must be a string")
            }
            Self::EmptyFieldName => write!(f, "schema field names cannot be empty"),
        }
    }
}

impl Error for SchemaError {}

/// Declared document type: field name to expected type tag.
///
/// Deserializing goes through the same field-name check as `from_json`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Schema {
    fields: BTreeMap<String, TypeTag>,
}

impl Schema {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces one field declaration.
    pub fn field(mut self, name: impl Into<String>, tag: TypeTag) -> Self {
        self.fields.insert(name.into(), tag);
        self
    }

    /// Builds a schema from a JSON object such as `{"name": "string"}`.
    ///
    /// # Errors
    /// - `NotAnObject` when `value` is not an object.
    /// - `NonStringTag` when a tag is not a JSON string.
    /// - `EmptyFieldName` when a key is blank.
    pub fn from_json(value: &serde_json::Value) -> Result<Self, SchemaError> {
        let object = value.as_object().ok_or(SchemaError::NotAnObject)?;
        let mut fields = BTreeMap::new();
        for (name, tag) in object {
            let tag = tag.as_str().ok_or_else(|| SchemaError::NonStringTag {
                field: name.clone(),
            })?;
            fields.insert(name.clone(), TypeTag::parse(tag));
        }
        Self::from_fields(fields)
    }

    /// Wraps already-parsed declarations.
    ///
    /// # Errors
    /// - `EmptyFieldName` when a key is blank.
    pub fn from_fields(fields: BTreeMap<String, TypeTag>) -> Result<Self, SchemaError> {
        if fields.keys().any(|name| name.trim().is_empty()) {
            return Err(SchemaError::EmptyFieldName);
        }
        Ok(Self { fields })
    }

    pub fn from_json_str(text: &str) -> Result<Self, SchemaError> {
        let value: serde_json::Value =
            serde_json::from_str(text).map_err(|err| SchemaError::Parse(err.to_string()))?;
        Self::from_json(&value)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Iterates field declarations in ascending field-name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &TypeTag)> {
        self.fields.iter().map(|(name, tag)| (name.as_str(), tag))
    }
}

impl<'de> Deserialize<'de> for Schema {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let fields = BTreeMap::<String, TypeTag>::deserialize(deserializer)?;
        Self::from_fields(fields).map_err(serde::de::Error::custom)
    }
}
