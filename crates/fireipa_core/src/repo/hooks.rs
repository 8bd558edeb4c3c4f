//! Pre-write hooks applied to raw data before validation.

use crate::model::value::{DocumentData, Value};
use crate::repo::document_model::Operation;
use chrono::{DateTime, Utc};

/// Mutates raw write data before it is validated.
///
/// Hooks run for `create`, `update` and `add`, in registration order.
pub trait PreWriteHook: Send + Sync {
    fn before_write(&self, operation: Operation, data: &mut DocumentData);
}

/// Writes a creation time captured once into newly created documents.
///
/// Applies to `create` and `add` only; `update` keeps the stored value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreationStamp {
    field: String,
    created_at: DateTime<Utc>,
}

impl CreationStamp {
    /// Captures the current time for stamping under `field`.
    pub fn new(field: impl Into<String>) -> Self {
        Self::at(field, Utc::now())
    }

    pub fn at(field: impl Into<String>, created_at: DateTime<Utc>) -> Self {
        Self {
            field: field.into(),
            created_at,
        }
    }

    pub fn field(&self) -> &str {
        &self.field
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

impl PreWriteHook for CreationStamp {
    fn before_write(&self, operation: Operation, data: &mut DocumentData) {
        if matches!(operation, Operation::Create | Operation::Add) {
            data.insert(self.field.clone(), Value::Timestamp(self.created_at));
        }
    }
}
