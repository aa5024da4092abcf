use std::sync::Arc;

use polydoc_store::{update, DocumentStore};
use serde_json::Value;
use tracing::debug;

use crate::engine::Collections;
use crate::error::Result;
use crate::record::RecordId;

/// Collection operations against a document store.
///
/// Every call loads the whole document; mutations save it back before
/// returning.
pub struct CollectionService<S: DocumentStore + ?Sized> {
    store: Arc<S>,
}

impl<S: DocumentStore + ?Sized> Clone for CollectionService<S> {
    fn clone(&self) -> Self {
        Self { store: Arc::clone(&self.store) }
    }
}

impl<S: DocumentStore + ?Sized> CollectionService<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn list(&self, name: &str) -> Result<Vec<Value>> {
        let tree = self.store.load()?;
        Ok(Collections::list(&tree, name)?.to_vec())
    }

    pub fn get(&self, name: &str, id: &RecordId) -> Result<Value> {
        let tree = self.store.load()?;
        Ok(Collections::get(&tree, name, id)?.clone())
    }

    pub fn insert(&self, name: &str, payload: Value) -> Result<Value> {
        let record = update(&*self.store, |tree| Collections::insert(tree, name, payload))?;
        debug!(collection = name, id = %record["id"], "inserted record");
        Ok(record)
    }

    pub fn replace(&self, name: &str, id: &RecordId, payload: Value) -> Result<Value> {
        let record = update(&*self.store, |tree| Collections::replace(tree, name, id, payload))?;
        debug!(collection = name, %id, "replaced record");
        Ok(record)
    }

    pub fn merge(&self, name: &str, id: &RecordId, payload: Value) -> Result<Value> {
        let record = update(&*self.store, |tree| Collections::merge(tree, name, id, payload))?;
        debug!(collection = name, %id, "merged record");
        Ok(record)
    }

    pub fn delete(&self, name: &str, id: &RecordId) -> Result<Value> {
        let record = update(&*self.store, |tree| Collections::delete(tree, name, id))?;
        debug!(collection = name, %id, "deleted record");
        Ok(record)
    }
}
