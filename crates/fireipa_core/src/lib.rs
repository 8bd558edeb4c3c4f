//! Schema-validated CRUD accessors over a schemaless document store.
//!
//! A `DocumentModel` binds a collection handle to a `Schema`, validates
//! write data before it reaches the store and normalizes reads.

pub mod diagnostics;
pub mod logging;
pub mod model;
pub mod repo;
pub mod store;
pub mod validation;

pub use diagnostics::{DiagnosticRecord, DiagnosticSink, LogSink, MemorySink};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::schema::{classify, Schema, SchemaError, TypeTag};
pub use model::value::{
    document_from_json, document_to_json, DocumentData, GeoPoint, RuntimeKind, Value,
};
pub use repo::document_model::{DocumentModel, Operation, RepoError, RepoResult, ID_FIELD};
pub use repo::hooks::{CreationStamp, PreWriteHook};
pub use store::{
    nested_collection, CollectionRef, DocumentRef, DocumentSnapshot, MemoryStore, StoreError,
    StoreResult,
};
pub use validation::{
    validate, FieldDiagnostic, FieldIssue, ValidatedDocument, ValidationError, ValidationReport,
};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
