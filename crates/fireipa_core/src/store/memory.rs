//! In-process document store.
//!
//! # Responsibility
//! - Implement the collection/document contracts over shared memory.
//! - Back tests and CLI tooling without an external database.
//!
//! # Invariants
//! - `set` replaces, `update` merges and requires an existing document.
//! - Enumeration order is ascending document id.
//! - Handles built from invalid segments fail every operation with
//!   `StoreError::InvalidPath`.

use super::{
    join_path, validate_segment, CollectionRef, DocumentRef, DocumentSnapshot, StoreError,
    StoreResult,
};
use crate::model::value::DocumentData;
use async_trait::async_trait;
use log::debug;
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

const GENERATED_ID_LEN: usize = 20;

#[derive(Default)]
struct StoreState {
    /// Collection path -> document id -> document body.
    collections: BTreeMap<String, BTreeMap<String, DocumentData>>,
}

/// Shared in-memory document tree.
///
/// Cloning is cheap; clones observe the same data.
#[derive(Clone, Default)]
pub struct MemoryStore {
    state: Arc<RwLock<StoreState>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a handle to the top-level collection `name`.
    pub fn collection(&self, name: &str) -> Arc<dyn CollectionRef> {
        Arc::new(MemoryCollection::new(self.clone(), "", None, name))
    }

    /// Returns the number of documents stored under `collection_path`.
    pub async fn document_count(&self, collection_path: &str) -> usize {
        self.state
            .read()
            .await
            .collections
            .get(collection_path)
            .map_or(0, BTreeMap::len)
    }

    /// Reads a document by full path, e.g. `users/alice/posts/p1`.
    pub async fn document(&self, path: &str) -> Option<DocumentData> {
        let (collection_path, id) = path.rsplit_once('/')?;
        self.state
            .read()
            .await
            .collections
            .get(collection_path)
            .and_then(|documents| documents.get(id))
            .cloned()
    }
}

struct MemoryCollection {
    store: MemoryStore,
    path: String,
    path_error: Option<StoreError>,
}

impl MemoryCollection {
    fn new(
        store: MemoryStore,
        parent_path: &str,
        parent_error: Option<StoreError>,
        name: &str,
    ) -> Self {
        let path_error = parent_error.or_else(|| validate_segment(name).err());
        Self {
            store,
            path: join_path(parent_path, name),
            path_error,
        }
    }

    fn check_path(&self) -> StoreResult<()> {
        match &self.path_error {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl CollectionRef for MemoryCollection {
    fn path(&self) -> &str {
        &self.path
    }

    fn doc(&self, id: &str) -> Arc<dyn DocumentRef> {
        let path_error = self
            .path_error
            .clone()
            .or_else(|| validate_segment(id).err());
        Arc::new(MemoryDocument {
            store: self.store.clone(),
            collection_path: self.path.clone(),
            id: id.to_string(),
            path: join_path(&self.path, id),
            path_error,
        })
    }

    async fn add(&self, data: DocumentData) -> StoreResult<String> {
        self.check_path()?;

        let mut state = self.store.state.write().await;
        let documents = state.collections.entry(self.path.clone()).or_default();
        let id = loop {
            let candidate = generate_id();
            if !documents.contains_key(&candidate) {
                break candidate;
            }
        };
        documents.insert(id.clone(), data);

        debug!(
            "event=store_add module=store status=ok collection={} doc_id={}",
            self.path, id
        );
        Ok(id)
    }

    async fn get(&self) -> StoreResult<Vec<DocumentSnapshot>> {
        self.check_path()?;

        let state = self.store.state.read().await;
        let snapshots = state
            .collections
            .get(&self.path)
            .map(|documents| {
                documents
                    .iter()
                    .map(|(id, data)| DocumentSnapshot {
                        id: id.clone(),
                        data: data.clone(),
                    })
                    .collect()
            })
            .unwrap_or_default();
        Ok(snapshots)
    }
}

struct MemoryDocument {
    store: MemoryStore,
    collection_path: String,
    id: String,
    path: String,
    path_error: Option<StoreError>,
}

impl MemoryDocument {
    fn check_path(&self) -> StoreResult<()> {
        match &self.path_error {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl DocumentRef for MemoryDocument {
    fn id(&self) -> &str {
        &self.id
    }

    fn path(&self) -> &str {
        &self.path
    }

    async fn get(&self) -> StoreResult<Option<DocumentData>> {
        self.check_path()?;

        let state = self.store.state.read().await;
        Ok(state
            .collections
            .get(&self.collection_path)
            .and_then(|documents| documents.get(&self.id))
            .cloned())
    }

    async fn set(&self, data: DocumentData) -> StoreResult<()> {
        self.check_path()?;

        let mut state = self.store.state.write().await;
        state
            .collections
            .entry(self.collection_path.clone())
            .or_default()
            .insert(self.id.clone(), data);

        debug!(
            "event=store_set module=store status=ok path={}",
            self.path
        );
        Ok(())
    }

    async fn update(&self, data: DocumentData) -> StoreResult<()> {
        self.check_path()?;

        let mut state = self.store.state.write().await;
        let existing = state
            .collections
            .get_mut(&self.collection_path)
            .and_then(|documents| documents.get_mut(&self.id))
            .ok_or_else(|| StoreError::NotFound(self.path.clone()))?;
        existing.extend(data);

        debug!(
            "event=store_update module=store status=ok path={}",
            self.path
        );
        Ok(())
    }

    fn collection(&self, name: &str) -> Arc<dyn CollectionRef> {
        Arc::new(MemoryCollection::new(
            self.store.clone(),
            &self.path,
            self.path_error.clone(),
            name,
        ))
    }
}

fn generate_id() -> String {
    let mut id = Uuid::new_v4().simple().to_string();
    id.truncate(GENERATED_ID_LEN);
    id
}
