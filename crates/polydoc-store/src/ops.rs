use std::sync::{MutexGuard, PoisonError};

use polydoc_codec::Tree;
use tracing::info;

use crate::error::{StoreError, StoreResult};
use crate::traits::DocumentStore;

fn lock<S: DocumentStore + ?Sized>(store: &S) -> MutexGuard<'_, ()> {
    // The guard protects no data, so a poisoned lock is still usable.
    store.write_lock().lock().unwrap_or_else(PoisonError::into_inner)
}

/// Load the document, apply `mutate`, and save the result.
///
/// The document is only saved when `mutate` succeeds. Calls on the same store
/// are serialized; writers in other processes are not coordinated with.
pub fn update<S, T, E, F>(store: &S, mutate: F) -> Result<T, E>
where
    S: DocumentStore + ?Sized,
    F: FnOnce(&mut Tree) -> Result<T, E>,
    E: From<StoreError>,
{
    let _guard = lock(store);
    let mut tree = store.load()?;
    let out = mutate(&mut tree)?;
    store.save(&tree)?;
    Ok(out)
}

/// Write `seed` if the store holds no document yet.
///
/// Returns `true` when the seed was written.
pub fn bootstrap<S: DocumentStore + ?Sized>(store: &S, seed: &Tree) -> StoreResult<bool> {
    let _guard = lock(store);
    if store.exists()? {
        return Ok(false);
    }
    store.save(seed)?;
    info!(location = %store.location(), "wrote seed document");
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{FileStore, InMemoryStore};
    use polydoc_codec::{Codec, Encoding, SequenceSchema};
    use serde_json::json;
    use std::sync::Arc;

    #[derive(Debug)]
    enum TestError {
        Store(StoreError),
        Rejected,
    }

    impl From<StoreError> for TestError {
        fn from(e: StoreError) -> Self {
            Self::Store(e)
        }
    }

    #[test]
    fn update_saves_on_success() {
        let store = InMemoryStore::with_document(Codec::new(Encoding::Json), &json!({"n": 1})).unwrap();
        let out: Result<i64, TestError> = update(&store, |tree| {
            tree["n"] = json!(2);
            Ok(2)
        });
        assert_eq!(out.unwrap(), 2);
        assert_eq!(store.load().unwrap(), json!({"n": 2}));
    }

    #[test]
    fn update_skips_save_on_error() {
        let store = InMemoryStore::with_document(Codec::new(Encoding::Json), &json!({"n": 1})).unwrap();
        let out: Result<(), TestError> = update(&store, |tree| {
            tree["n"] = json!(99);
            Err(TestError::Rejected)
        });
        assert!(matches!(out, Err(TestError::Rejected)));
        assert_eq!(store.load().unwrap(), json!({"n": 1}));
    }

    #[test]
    fn update_on_missing_document_fails() {
        let store = InMemoryStore::new(Codec::new(Encoding::Json));
        let out: Result<(), TestError> = update(&store, |_| Ok(()));
        assert!(matches!(out, Err(TestError::Store(StoreError::NotFound(_)))));
    }

    #[test]
    fn concurrent_updates_are_serialized() {
        let dir = tempfile::tempdir().unwrap();
        let store = Arc::new(FileStore::open(dir.path().join("db.json"), SequenceSchema::none()).unwrap());
        store.save(&json!({"count": 0})).unwrap();

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let store = Arc::clone(&store);
                std::thread::spawn(move || {
                    for _ in 0..5 {
                        let r: Result<(), StoreError> = update(store.as_ref(), |tree| {
                            let n = tree["count"].as_i64().unwrap_or_default();
                            tree["count"] = json!(n + 1);
                            Ok(())
                        });
                        r.unwrap();
                    }
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }
        assert_eq!(store.load().unwrap()["count"], json!(40));
    }

    #[test]
    fn bootstrap_writes_seed_once() {
        let store = InMemoryStore::new(Codec::new(Encoding::Yaml));
        assert!(bootstrap(&store, &json!({"seed": 1})).unwrap());
        assert!(!bootstrap(&store, &json!({"seed": 2})).unwrap());
        assert_eq!(store.load().unwrap(), json!({"seed": 1}));
    }

    #[test]
    fn bootstrap_leaves_existing_file_alone() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::open(dir.path().join("db.xml"), SequenceSchema::none()).unwrap();
        store.save(&json!({"kept": true})).unwrap();
        assert!(!bootstrap(&store, &json!({"seed": 1})).unwrap());
        assert_eq!(store.load().unwrap(), json!({"kept": true}));
    }
}
