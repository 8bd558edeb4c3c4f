//! Schema-bound document accessor over a collection handle.
//!
//! # Responsibility
//! - Validate write data against the bound schema before touching the store.
//! - Normalize single-document reads through the same validator.
//! - Turn every failure into a typed `RepoError` instead of panicking.
//!
//! # Invariants
//! - `create`/`update`/`add` call the store only after validation succeeds.
//! - Each operation performs at most one store call.
//! - `get` distinguishes a missing document from one that failed validation.

use crate::diagnostics::{DiagnosticSink, LogSink};
use crate::model::schema::Schema;
use crate::model::value::{DocumentData, Value};
use crate::repo::hooks::PreWriteHook;
use crate::store::{nested_collection, CollectionRef, StoreError};
use crate::validation::{validate, ValidatedDocument, ValidationError};
use chrono::{DateTime, Utc};
use log::debug;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::Arc;
use std::time::Instant;

/// Field attached to every `get_all` entry.
pub const ID_FIELD: &str = "id";

pub type RepoResult<T> = Result<T, RepoError>;

/// Accessor operation failure.
#[derive(Debug, Clone, PartialEq)]
pub enum RepoError {
    /// No schema field survived validation; the store was not called.
    Validation(ValidationError),
    /// The store client failed; its error value is passed through.
    Store(StoreError),
    /// `get` found no document with this id.
    NotFound(String),
}

impl RepoError {
    /// Stable short code used in log records.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Validation(_) => "validation_failed",
            Self::Store(_) => "store_failed",
            Self::NotFound(_) => "not_found",
        }
    }
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Store(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "document not found: {id}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Store(err) => Some(err),
            Self::NotFound(_) => None,
        }
    }
}

impl From<ValidationError> for RepoError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<StoreError> for RepoError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}

/// Accessor operation name, used for hooks and diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Create,
    Update,
    Add,
    Get,
    GetAll,
}

impl Operation {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::Update => "update",
            Self::Add => "add",
            Self::Get => "get",
            Self::GetAll => "get_all",
        }
    }
}

/// Typed accessor binding one collection to one schema.
///
/// Holds only shared immutable state, so one instance may serve concurrent
/// calls as far as the underlying store allows.
pub struct DocumentModel {
    collection: Arc<dyn CollectionRef>,
    schema: Arc<Schema>,
    sink: Arc<dyn DiagnosticSink>,
    hooks: Vec<Arc<dyn PreWriteHook>>,
    created_at: Option<DateTime<Utc>>,
}

impl DocumentModel {
    /// Binds `schema` to `collection`. Diagnostics go to `LogSink`.
    pub fn new(collection: Arc<dyn CollectionRef>, schema: Schema) -> Self {
        Self {
            collection,
            schema: Arc::new(schema),
            sink: Arc::new(LogSink),
            hooks: Vec::new(),
            created_at: None,
        }
    }

    /// Binds `schema` to sub-collection `sub_collection` of document
    /// `parent_id` in `collection`.
    pub fn nested(
        collection: Arc<dyn CollectionRef>,
        parent_id: &str,
        sub_collection: &str,
        schema: Schema,
    ) -> Self {
        Self::new(
            nested_collection(collection.as_ref(), parent_id, sub_collection),
            schema,
        )
    }

    /// Like `new`, additionally recording the construction time.
    ///
    /// The time is exposed through `created_at()` only; register a
    /// `CreationStamp` hook to write it into documents.
    pub fn timestamped(collection: Arc<dyn CollectionRef>, schema: Schema) -> Self {
        let mut model = Self::new(collection, schema);
        model.created_at = Some(Utc::now());
        model
    }

    pub fn with_sink(mut self, sink: Arc<dyn DiagnosticSink>) -> Self {
        self.sink = sink;
        self
    }

    pub fn with_hook(mut self, hook: Arc<dyn PreWriteHook>) -> Self {
        self.hooks.push(hook);
        self
    }

    pub fn collection(&self) -> &Arc<dyn CollectionRef> {
        &self.collection
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        self.created_at
    }

    /// Validates `data` against the bound schema, reporting field findings to
    /// the sink.
    pub fn validate(&self, data: &DocumentData) -> Result<ValidatedDocument, ValidationError> {
        let report = validate(&self.schema, data);
        for diagnostic in &report.diagnostics {
            self.sink.field_issue(self.collection.path(), diagnostic);
        }
        report.into_result()
    }

    /// Writes `data` at `id`, replacing any existing document.
    ///
    /// Returns `id` on success.
    pub async fn create(&self, id: &str, data: DocumentData) -> RepoResult<String> {
        let started_at = Instant::now();
        let result = self.write_create(id, data).await;
        self.finish(Operation::Create, Some(id), started_at, result)
    }

    /// Merges `data` into the existing document at `id`.
    ///
    /// Returns `id` on success. Fields absent from `data` are written as
    /// null because the validated document always carries every field.
    pub async fn update(&self, id: &str, data: DocumentData) -> RepoResult<String> {
        let started_at = Instant::now();
        let result = self.write_update(id, data).await;
        self.finish(Operation::Update, Some(id), started_at, result)
    }

    /// Inserts `data` under a store-generated id and returns that id.
    pub async fn add(&self, data: DocumentData) -> RepoResult<String> {
        let started_at = Instant::now();
        let result = self.write_add(data).await;
        let doc_id = result.as_ref().ok().cloned();
        self.finish(Operation::Add, doc_id.as_deref(), started_at, result)
    }

    /// Reads the document at `id` and normalizes it through the schema.
    ///
    /// # Errors
    /// - `NotFound` when no document exists at `id`.
    /// - `Validation` when the stored document matches no schema field.
    /// - `Store` when the read itself fails.
    pub async fn get(&self, id: &str) -> RepoResult<ValidatedDocument> {
        let started_at = Instant::now();
        let result = self.read_one(id).await;
        self.finish(Operation::Get, Some(id), started_at, result)
    }

    /// Lists every document of the collection without validation.
    ///
    /// Each entry carries its document id under `ID_FIELD`, replacing any
    /// stored field of that name. Order follows the store's enumeration.
    pub async fn get_all(&self) -> RepoResult<Vec<DocumentData>> {
        let started_at = Instant::now();
        let result = self
            .collection
            .get()
            .await
            .map(|snapshots| {
                snapshots
                    .into_iter()
                    .map(|snapshot| {
                        let mut data = snapshot.data;
                        data.insert(ID_FIELD.to_string(), Value::String(snapshot.id));
                        data
                    })
                    .collect::<Vec<_>>()
            })
            .map_err(RepoError::from);
        self.finish(Operation::GetAll, None, started_at, result)
    }

    async fn write_create(&self, id: &str, data: DocumentData) -> RepoResult<String> {
        let document = self.prepare_write(Operation::Create, data)?;
        self.collection.doc(id).set(document.into_inner()).await?;
        Ok(id.to_string())
    }

    async fn write_update(&self, id: &str, data: DocumentData) -> RepoResult<String> {
        let document = self.prepare_write(Operation::Update, data)?;
        self.collection.doc(id).update(document.into_inner()).await?;
        Ok(id.to_string())
    }

    async fn write_add(&self, data: DocumentData) -> RepoResult<String> {
        let document = self.prepare_write(Operation::Add, data)?;
        Ok(self.collection.add(document.into_inner()).await?)
    }

    async fn read_one(&self, id: &str) -> RepoResult<ValidatedDocument> {
        let raw = self
            .collection
            .doc(id)
            .get()
            .await?
            .ok_or_else(|| RepoError::NotFound(id.to_string()))?;
        Ok(self.validate(&raw)?)
    }

    fn prepare_write(
        &self,
        operation: Operation,
        mut data: DocumentData,
    ) -> Result<ValidatedDocument, ValidationError> {
        for hook in &self.hooks {
            hook.before_write(operation, &mut data);
        }
        self.validate(&data)
    }

    fn finish<T>(
        &self,
        operation: Operation,
        doc_id: Option<&str>,
        started_at: Instant,
        result: RepoResult<T>,
    ) -> RepoResult<T> {
        match &result {
            Ok(_) => debug!(
                "event=doc_{} module=repo status=ok collection={} doc_id={} duration_ms={}",
                operation.as_str(),
                self.collection.path(),
                doc_id.unwrap_or("-"),
                started_at.elapsed().as_millis()
            ),
            Err(err) => self
                .sink
                .operation_failed(self.collection.path(), operation, err),
        }
        result
    }
}
