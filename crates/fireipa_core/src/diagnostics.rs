//! Injectable diagnostics channel for accessor operations.
//!
//! # Responsibility
//! - Receive per-field validation findings and failed operations.
//! - Keep validation itself free of logging side effects.
//!
//! # Invariants
//! - Sinks never influence control flow; reporting cannot fail.
//! - `LogSink` emits metadata-only records; field values are never logged.

use crate::repo::document_model::{Operation, RepoError};
use crate::validation::{FieldDiagnostic, FieldIssue};
use log::{error, warn};
use std::sync::Mutex;

/// Receiver for accessor diagnostics.
pub trait DiagnosticSink: Send + Sync {
    fn field_issue(&self, collection: &str, diagnostic: &FieldDiagnostic);

    fn operation_failed(&self, collection: &str, operation: Operation, error: &RepoError);
}

/// Default sink writing `log` records.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

impl DiagnosticSink for LogSink {
    fn field_issue(&self, collection: &str, diagnostic: &FieldDiagnostic) {
        match &diagnostic.issue {
            FieldIssue::Missing => warn!(
                "event=field_missing module=validation status=warn collection={} field={}",
                collection, diagnostic.field
            ),
            FieldIssue::KindMismatch {
                expected,
                actual,
                passed_through,
            } => warn!(
                "event=field_kind_mismatch module=validation status=warn collection={} field={} expected={} actual={} passed_through={}",
                collection, diagnostic.field, expected, actual, passed_through
            ),
        }
    }

    fn operation_failed(&self, collection: &str, operation: Operation, err: &RepoError) {
        error!(
            "event=doc_{} module=repo status=error collection={} error_code={} error={}",
            operation.as_str(),
            collection,
            err.code(),
            err
        );
    }
}

/// Recorded diagnostic, as captured by `MemorySink`.
#[derive(Debug, Clone, PartialEq)]
pub enum DiagnosticRecord {
    Field {
        collection: String,
        diagnostic: FieldDiagnostic,
    },
    Failure {
        collection: String,
        operation: Operation,
        error: RepoError,
    },
}

/// Sink that keeps every record in memory, mainly for tests.
#[derive(Debug, Default)]
pub struct MemorySink {
    records: Mutex<Vec<DiagnosticRecord>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of all records captured so far.
    pub fn records(&self) -> Vec<DiagnosticRecord> {
        match self.records.lock() {
            Ok(records) => records.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    pub fn field_diagnostics(&self) -> Vec<FieldDiagnostic> {
        self.records()
            .into_iter()
            .filter_map(|record| match record {
                DiagnosticRecord::Field { diagnostic, .. } => Some(diagnostic),
                DiagnosticRecord::Failure { .. } => None,
            })
            .collect()
    }

    pub fn failures(&self) -> Vec<(Operation, RepoError)> {
        self.records()
            .into_iter()
            .filter_map(|record| match record {
                DiagnosticRecord::Failure {
                    operation, error, ..
                } => Some((operation, error)),
                DiagnosticRecord::Field { .. } => None,
            })
            .collect()
    }

    fn push(&self, record: DiagnosticRecord) {
        match self.records.lock() {
            Ok(mut records) => records.push(record),
            Err(poisoned) => poisoned.into_inner().push(record),
        }
    }
}

impl DiagnosticSink for MemorySink {
    fn field_issue(&self, collection: &str, diagnostic: &FieldDiagnostic) {
        self.push(DiagnosticRecord::Field {
            collection: collection.to_string(),
            diagnostic: diagnostic.clone(),
        });
    }

    fn operation_failed(&self, collection: &str, operation: Operation, err: &RepoError) {
        self.push(DiagnosticRecord::Failure {
            collection: collection.to_string(),
            operation,
            error: err.clone(),
        });
    }
}
