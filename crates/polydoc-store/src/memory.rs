use std::sync::{Mutex, PoisonError, RwLock};

use polydoc_codec::{Codec, Encoding, Tree};

use crate::error::{StoreError, StoreResult};
use crate::traits::DocumentStore;

/// In-memory document store.
///
/// Intended for tests and embedding. The document is kept as encoded bytes
/// and goes through the same codec as a [`FileStore`](crate::FileStore), so
/// encoding behaviour is identical.
pub struct InMemoryStore {
    codec: Codec,
    bytes: RwLock<Option<Vec<u8>>>,
    writer: Mutex<()>,
}

impl InMemoryStore {
    /// Create an empty store.
    pub fn new(codec: Codec) -> Self {
        Self {
            codec,
            bytes: RwLock::new(None),
            writer: Mutex::new(()),
        }
    }

    /// Create a store holding `tree`.
    pub fn with_document(codec: Codec, tree: &Tree) -> StoreResult<Self> {
        let store = Self::new(codec);
        store.save(tree)?;
        Ok(store)
    }

    /// Create a store holding raw encoded bytes.
    pub fn from_bytes(codec: Codec, bytes: impl Into<Vec<u8>>) -> Self {
        let store = Self::new(codec);
        *store.bytes.write().unwrap_or_else(PoisonError::into_inner) = Some(bytes.into());
        store
    }

    /// The currently stored bytes, if any.
    pub fn bytes(&self) -> Option<Vec<u8>> {
        self.bytes.read().unwrap_or_else(PoisonError::into_inner).clone()
    }
}

impl DocumentStore for InMemoryStore {
    fn load(&self) -> StoreResult<Tree> {
        let bytes = self.bytes.read().unwrap_or_else(PoisonError::into_inner);
        match bytes.as_deref() {
            Some(bytes) => Ok(self.codec.decode(bytes)?),
            None => Err(StoreError::NotFound(self.location())),
        }
    }

    fn save(&self, tree: &Tree) -> StoreResult<()> {
        let encoded = self.codec.encode(tree)?;
        *self.bytes.write().unwrap_or_else(PoisonError::into_inner) = Some(encoded);
        Ok(())
    }

    fn exists(&self) -> StoreResult<bool> {
        Ok(self.bytes.read().unwrap_or_else(PoisonError::into_inner).is_some())
    }

    fn encoding(&self) -> Encoding {
        self.codec.encoding()
    }

    fn location(&self) -> String {
        format!("memory:{}", self.codec.encoding())
    }

    fn write_lock(&self) -> &Mutex<()> {
        &self.writer
    }
}

impl std::fmt::Debug for InMemoryStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let len = self.bytes().map(|b| b.len());
        f.debug_struct("InMemoryStore")
            .field("encoding", &self.codec.encoding())
            .field("bytes", &len)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use polydoc_codec::SequenceSchema;
    use serde_json::json;

    #[test]
    fn empty_store_is_not_found() {
        let store = InMemoryStore::new(Codec::new(Encoding::Json));
        assert!(!store.exists().unwrap());
        assert!(store.load().unwrap_err().is_not_found());
        assert_eq!(store.location(), "memory:json");
    }

    #[test]
    fn holds_encoded_bytes() {
        let codec = Codec::new(Encoding::Yaml);
        let store = InMemoryStore::with_document(codec, &json!({"users": []})).unwrap();
        assert_eq!(store.bytes().unwrap(), b"users: []\n");
    }

    #[test]
    fn from_bytes_goes_through_codec() {
        let codec = Codec::new(Encoding::Xml).with_schema(SequenceSchema::collections());
        let store = InMemoryStore::from_bytes(codec, "<database><users><id>4</id></users></database>");
        assert_eq!(store.load().unwrap(), json!({"users": [{"id": 4}]}));
    }

    #[test]
    fn failed_save_keeps_previous_bytes() {
        let store = InMemoryStore::with_document(Codec::new(Encoding::Xml), &json!({"a": 1})).unwrap();
        let before = store.bytes();
        assert!(store.save(&json!("scalar root")).is_err());
        assert_eq!(store.bytes(), before);
    }
}
