use std::sync::Arc;

use polydoc_codec::Tree;
use polydoc_store::{update, DocumentStore};
use serde_json::Value;
use tracing::debug;

use crate::error::LibraryResult;
use crate::projection::{BatchView, Projections};

/// Library projections against a document store.
pub struct LibraryService<S: DocumentStore + ?Sized> {
    store: Arc<S>,
}

impl<S: DocumentStore + ?Sized> Clone for LibraryService<S> {
    fn clone(&self) -> Self {
        Self { store: Arc::clone(&self.store) }
    }
}

impl<S: DocumentStore + ?Sized> LibraryService<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// The whole stored document.
    pub fn document(&self) -> LibraryResult<Tree> {
        Ok(self.store.load()?)
    }

    pub fn borrow(&self) -> LibraryResult<Value> {
        let tree = self.store.load()?;
        Ok(Projections::borrow(&tree)?.clone())
    }

    pub fn list_batches(&self) -> LibraryResult<Vec<BatchView>> {
        Projections::list_batches(&self.store.load()?)
    }

    pub fn get_batch(&self, batch_id: i64) -> LibraryResult<BatchView> {
        Projections::get_batch(&self.store.load()?, batch_id)
    }

    pub fn list_all_authors(&self) -> LibraryResult<Vec<Value>> {
        Projections::list_all_authors(&self.store.load()?)
    }

    pub fn list_all_books(&self) -> LibraryResult<Vec<Value>> {
        Projections::list_all_books(&self.store.load()?)
    }

    pub fn list_all_students(&self) -> LibraryResult<Vec<Value>> {
        Projections::list_all_students(&self.store.load()?)
    }

    pub fn add_book_to_batch(&self, batch_id: i64, book: Value) -> LibraryResult<Value> {
        let book = update(&*self.store, |tree| Projections::add_book_to_batch(tree, batch_id, book))?;
        debug!(batch_id, book_id = %book["book_id"], "added book to batch");
        Ok(book)
    }
}
