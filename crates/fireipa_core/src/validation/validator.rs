//! Lenient per-field document validation.
//!
//! # Responsibility
//! - Produce a sanitized document restricted to the schema's fields.
//! - Count fields that end up null and reject only when all of them do.
//!
//! # Invariants
//! - Values are never coerced; nested shapes are not inspected.
//! - A present value whose kind mismatches is kept when truthy and nulled
//!   when falsy. Both cases are reported.

use crate::model::schema::{classify, Schema};
use crate::model::value::{DocumentData, RuntimeKind, Value};
use serde::Serialize;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::ops::Deref;

/// Reason the validator rejected a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Every schema field was absent or falsy with a mismatched kind.
    ///
    /// An empty schema always lands here with `fields == 0`.
    NoFieldSurvived { fields: usize },
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NoFieldSurvived { fields } => {
                write!(f, "document matched none of {fields} schema fields")
            }
        }
    }
}

impl Error for ValidationError {}

/// Finding for one field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "issue", rename_all = "snake_case")]
pub enum FieldIssue {
    /// Field absent from the input; stored as null.
    Missing,
    /// Field present with a different kind than declared.
    KindMismatch {
        expected: RuntimeKind,
        actual: RuntimeKind,
        /// `true` when the truthy value was kept as-is, `false` when nulled.
        passed_through: bool,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldDiagnostic {
    pub field: String,
    #[serde(flatten)]
    pub issue: FieldIssue,
}

/// Document whose field set equals its schema's field set.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedDocument(DocumentData);

impl ValidatedDocument {
    pub fn into_inner(self) -> DocumentData {
        self.0
    }
}

impl Deref for ValidatedDocument {
    type Target = DocumentData;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl From<ValidatedDocument> for DocumentData {
    fn from(value: ValidatedDocument) -> Self {
        value.0
    }
}

/// Outcome of one validation pass plus the findings it produced.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationReport {
    pub outcome: Result<ValidatedDocument, ValidationError>,
    pub diagnostics: Vec<FieldDiagnostic>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.outcome.is_ok()
    }

    pub fn into_result(self) -> Result<ValidatedDocument, ValidationError> {
        self.outcome
    }
}

/// Validates `raw` against `schema`.
///
/// Extra keys in `raw` are dropped. Fields that are absent, or present with
/// a mismatched kind and a falsy value, are stored as `Value::Null`. The
/// document is rejected only when that happened to every field.
pub fn validate(schema: &Schema, raw: &DocumentData) -> ValidationReport {
    let mut document = DocumentData::new();
    let mut diagnostics = Vec::new();
    let mut null_fields = 0usize;

    for (field, tag) in schema.iter() {
        let expected = classify(tag);
        let value = match raw.get(field) {
            None => {
                null_fields += 1;
                diagnostics.push(FieldDiagnostic {
                    field: field.to_string(),
                    issue: FieldIssue::Missing,
                });
                Value::Null
            }
            Some(value) if value.kind() == expected => value.clone(),
            Some(value) => {
                let passed_through = value.is_truthy();
                diagnostics.push(FieldDiagnostic {
                    field: field.to_string(),
                    issue: FieldIssue::KindMismatch {
                        expected,
                        actual: value.kind(),
                        passed_through,
                    },
                });
                if passed_through {
                    value.clone()
                } else {
                    null_fields += 1;
                    Value::Null
                }
            }
        };
        document.insert(field.to_string(), value);
    }

    let outcome = if null_fields == schema.len() {
        Err(ValidationError::NoFieldSurvived {
            fields: schema.len(),
        })
    } else {
        Ok(ValidatedDocument(document))
    };

    ValidationReport {
        outcome,
        diagnostics,
    }
}

#[cfg(test)]
mod tests {
    use super::{validate, FieldIssue, ValidationError};
    use crate::model::schema::{Schema, TypeTag};
    use crate::model::value::{DocumentData, RuntimeKind, Value};

    fn person_schema() -> Schema {
        Schema::new()
            .field("name", TypeTag::String)
            .field("age", TypeTag::Number)
    }

    #[test]
    fn matching_null_value_is_not_counted_missing() {
        let schema = Schema::new().field("deleted_at", TypeTag::Null);
        let raw = DocumentData::from([("deleted_at".to_string(), Value::Null)]);

        let report = validate(&schema, &raw);
        let document = report.into_result().unwrap();
        assert_eq!(document["deleted_at"], Value::Null);
    }

    #[test]
    fn unknown_tag_only_survives_through_truthiness() {
        let schema = Schema::new().field("blob", TypeTag::parse("decimal"));
        let raw = DocumentData::from([("blob".to_string(), Value::from("1.50"))]);

        let report = validate(&schema, &raw);
        assert_eq!(
            report.diagnostics[0].issue,
            FieldIssue::KindMismatch {
                expected: RuntimeKind::Undefined,
                actual: RuntimeKind::String,
                passed_through: true,
            }
        );
        assert_eq!(report.into_result().unwrap()["blob"], Value::from("1.50"));
    }

    #[test]
    fn empty_schema_is_always_rejected() {
        let raw = DocumentData::from([("name".to_string(), Value::from("Alice"))]);
        let report = validate(&Schema::new(), &raw);
        assert_eq!(
            report.outcome.unwrap_err(),
            ValidationError::NoFieldSurvived { fields: 0 }
        );
    }

    #[test]
    fn partial_documents_are_accepted_with_nulls() {
        let raw = DocumentData::from([("name".to_string(), Value::from("Alice"))]);
        let report = validate(&person_schema(), &raw);

        assert_eq!(report.diagnostics.len(), 1);
        assert_eq!(report.diagnostics[0].field, "age");
        let document = report.into_result().unwrap();
        assert_eq!(document["age"], Value::Null);
        assert_eq!(document["name"], Value::from("Alice"));
    }
}
