//! Document store client contracts.
//!
//! # Responsibility
//! - Describe the collection/document handles the accessor drives.
//! - Provide an in-process implementation for tests and local tooling.
//!
//! # Invariants
//! - Handles are cheap `Arc` clones; the store owns the data.
//! - Failures surface as `StoreError` values and are never retried here.

use crate::model::value::DocumentData;
use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::Arc;

mod memory;

pub use memory::MemoryStore;

static RESERVED_SEGMENT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^__.*__$").expect("valid reserved segment regex"));

pub type StoreResult<T> = Result<T, StoreError>;

/// Failure value reported by a store client.
#[derive(Debug, Clone)]
pub enum StoreError {
    /// Target document does not exist (e.g. `update` on a missing path).
    NotFound(String),
    /// A collection or document path segment is not usable.
    InvalidPath(String),
    /// Backend failure known only by its message.
    Backend(String),
    /// Error raised by a client library, kept as the `source()` of this one.
    Client {
        message: String,
        source: Arc<dyn Error + Send + Sync>,
    },
}

impl StoreError {
    /// Wraps a client library error, keeping it reachable through `source()`.
    pub fn client(err: impl Error + Send + Sync + 'static) -> Self {
        Self::Client {
            message: err.to_string(),
            source: Arc::new(err),
        }
    }
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound(path) => write!(f, "no document to update: {path}"),
            Self::InvalidPath(message) => write!(f, "invalid path: {message}"),
            Self::Backend(message) | Self::Client { message, .. } => {
                write!(f, "store failure: {message}")
            }
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Client { source, .. } => Some(source.as_ref()),
            Self::NotFound(_) | Self::InvalidPath(_) | Self::Backend(_) => None,
        }
    }
}

/// Client errors compare by message; the wrapped value is not comparable.
impl PartialEq for StoreError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::NotFound(left), Self::NotFound(right))
            | (Self::InvalidPath(left), Self::InvalidPath(right))
            | (Self::Backend(left), Self::Backend(right)) => left == right,
            (Self::Client { message: left, .. }, Self::Client { message: right, .. }) => {
                left == right
            }
            _ => false,
        }
    }
}

impl Eq for StoreError {}

/// One enumerated document of a collection.
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentSnapshot {
    pub id: String,
    pub data: DocumentData,
}

/// Handle to one collection.
#[async_trait]
pub trait CollectionRef: Send + Sync {
    /// Slash-separated collection path, e.g. `users/alice/posts`.
    fn path(&self) -> &str;

    fn doc(&self, id: &str) -> Arc<dyn DocumentRef>;

    /// Inserts `data` under a store-generated id and returns that id.
    async fn add(&self, data: DocumentData) -> StoreResult<String>;

    /// Enumerates every document of the collection.
    async fn get(&self) -> StoreResult<Vec<DocumentSnapshot>>;
}

/// Handle to one document.
#[async_trait]
pub trait DocumentRef: Send + Sync {
    fn id(&self) -> &str;

    fn path(&self) -> &str;

    /// Returns `None` when the document does not exist.
    async fn get(&self) -> StoreResult<Option<DocumentData>>;

    /// Writes `data`, replacing any existing document.
    async fn set(&self, data: DocumentData) -> StoreResult<()>;

    /// Merges `data` into an existing document.
    async fn update(&self, data: DocumentData) -> StoreResult<()>;

    fn collection(&self, name: &str) -> Arc<dyn CollectionRef>;
}

/// Derives the handle of sub-collection `name` under document `parent_id`.
pub fn nested_collection(
    collection: &dyn CollectionRef,
    parent_id: &str,
    name: &str,
) -> Arc<dyn CollectionRef> {
    collection.doc(parent_id).collection(name)
}

/// Checks one path segment (collection name or document id).
///
/// # Errors
/// - Returns `InvalidPath` when the segment is blank, contains `/`, is `.`
///   or `..`, or has the reserved `__name__` form.
pub fn validate_segment(segment: &str) -> StoreResult<()> {
    if segment.trim().is_empty() {
        return Err(StoreError::InvalidPath("path segment cannot be empty".to_string()));
    }
    if segment.contains('/') {
        return Err(StoreError::InvalidPath(format!(
            "path segment `{segment}` cannot contain `/`"
        )));
    }
    if segment == "." || segment == ".." {
        return Err(StoreError::InvalidPath(format!(
            "path segment `{segment}` is not allowed"
        )));
    }
    if RESERVED_SEGMENT_RE.is_match(segment) {
        return Err(StoreError::InvalidPath(format!(
            "path segment `{segment}` is reserved"
        )));
    }
    Ok(())
}

pub(crate) fn join_path(parent: &str, segment: &str) -> String {
    if parent.is_empty() {
        segment.to_string()
    } else {
        format!("{parent}/{segment}")
    }
}
