use std::sync::Mutex;

use polydoc_codec::{Encoding, Tree};

use crate::error::StoreResult;

/// Whole-document store.
///
/// All implementations must satisfy these invariants:
/// - `load` rebuilds the tree from the backing bytes on every call; nothing
///   is cached between calls.
/// - `save` writes the entire tree, never a diff.
/// - A failed `save` leaves the previously stored document readable.
/// - All I/O and codec errors are propagated, never silently ignored.
pub trait DocumentStore: Send + Sync {
    /// Read and decode the whole document.
    ///
    /// Returns `StoreError::NotFound` if no document has been stored yet.
    fn load(&self) -> StoreResult<Tree>;

    /// Encode and replace the whole document.
    fn save(&self, tree: &Tree) -> StoreResult<()>;

    /// Check whether a document has been stored.
    fn exists(&self) -> StoreResult<bool>;

    /// Encoding of the stored bytes.
    fn encoding(&self) -> Encoding;

    /// Human-readable location used in logs and errors.
    fn location(&self) -> String;

    /// Serializes the load-mutate-save windows opened through
    /// [`update`](crate::update) within this process.
    fn write_lock(&self) -> &Mutex<()>;
}
