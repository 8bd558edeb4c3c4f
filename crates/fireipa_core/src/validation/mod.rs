//! Schema validation for document bodies.
//!
//! # Responsibility
//! - Check raw documents against a schema field by field.
//! - Report per-field findings without side effects.
//!
//! # Invariants
//! - A validated document always has exactly the schema's field names.
//! - A document is rejected only when no field survives.

pub mod validator;

pub use validator::{
    validate, FieldDiagnostic, FieldIssue, ValidatedDocument, ValidationError, ValidationReport,
};
