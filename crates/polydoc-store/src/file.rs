use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use polydoc_codec::{Codec, Encoding, SequenceSchema, Tree};
use tempfile::NamedTempFile;
use tracing::debug;

use crate::error::{StoreError, StoreResult};
use crate::traits::DocumentStore;

/// Document persisted as a single file; the extension picks the encoding.
///
/// Saves go to a temporary file in the target directory which is then
/// renamed over the target, so readers only ever see a complete document.
pub struct FileStore {
    path: PathBuf,
    codec: Codec,
    writer: Mutex<()>,
}

impl FileStore {
    /// Open a store at `path`, selecting the codec from its extension.
    pub fn open(path: impl Into<PathBuf>, schema: SequenceSchema) -> StoreResult<Self> {
        let path = path.into();
        let encoding = Encoding::from_path(&path)?;
        Ok(Self::with_codec(path, Codec::new(encoding).with_schema(schema)))
    }

    /// Open a store with an explicitly configured codec.
    pub fn with_codec(path: impl Into<PathBuf>, codec: Codec) -> Self {
        Self {
            path: path.into(),
            codec,
            writer: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn codec(&self) -> &Codec {
        &self.codec
    }

    fn directory(&self) -> &Path {
        match self.path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir,
            _ => Path::new("."),
        }
    }
}

impl DocumentStore for FileStore {
    fn load(&self) -> StoreResult<Tree> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(StoreError::NotFound(self.location()));
            }
            Err(e) => return Err(e.into()),
        };
        let tree = self.codec.decode(&bytes)?;
        debug!(path = %self.path.display(), bytes = bytes.len(), "loaded document");
        Ok(tree)
    }

    fn save(&self, tree: &Tree) -> StoreResult<()> {
        let bytes = self.codec.encode(tree)?;
        let dir = self.directory();
        fs::create_dir_all(dir)?;

        let mut tmp = NamedTempFile::new_in(dir)?;
        tmp.write_all(&bytes)?;
        tmp.as_file().sync_all()?;
        if let Ok(meta) = fs::metadata(&self.path) {
            tmp.as_file().set_permissions(meta.permissions())?;
        }
        tmp.persist(&self.path).map_err(|e| e.error)?;

        debug!(path = %self.path.display(), bytes = bytes.len(), "saved document");
        Ok(())
    }

    fn exists(&self) -> StoreResult<bool> {
        Ok(self.path.try_exists()?)
    }

    fn encoding(&self) -> Encoding {
        self.codec.encoding()
    }

    fn location(&self) -> String {
        self.path.display().to_string()
    }

    fn write_lock(&self) -> &Mutex<()> {
        &self.writer
    }
}

impl std::fmt::Debug for FileStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileStore")
            .field("path", &self.path)
            .field("encoding", &self.codec.encoding())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use polydoc_codec::CodecError;
    use serde_json::json;

    fn doc() -> Tree {
        json!({
            "users": [{"id": 1, "name": "Ada"}],
            "posts": [{"id": 1, "title": "Hello"}, {"id": 2, "title": "Again"}]
        })
    }

    #[test]
    fn save_then_load_each_encoding() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["db.json", "db.yml", "db.yaml", "db.xml"] {
            let store = FileStore::open(dir.path().join(name), SequenceSchema::collections()).unwrap();
            store.save(&doc()).unwrap();
            assert_eq!(store.load().unwrap(), doc(), "{name}");
        }
    }

    #[test]
    fn extension_selects_encoding() {
        let store = FileStore::open("db_files/db.yml", SequenceSchema::none()).unwrap();
        assert_eq!(store.encoding(), Encoding::Yaml);
    }

    #[test]
    fn unknown_extension_rejected() {
        let err = FileStore::open("db.csv", SequenceSchema::none()).unwrap_err();
        assert!(matches!(err, StoreError::Codec(CodecError::UnsupportedFormat(_))));
    }

    #[test]
    fn missing_file_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::open(dir.path().join("db.json"), SequenceSchema::none()).unwrap();
        assert!(!store.exists().unwrap());
        let err = store.load().unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn malformed_file_is_codec_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("db.json");
        fs::write(&path, "{not json").unwrap();
        let store = FileStore::open(&path, SequenceSchema::none()).unwrap();
        assert!(matches!(
            store.load().unwrap_err(),
            StoreError::Codec(CodecError::Parse { .. })
        ));
    }

    #[test]
    fn save_creates_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("db_files").join("db.json");
        let store = FileStore::open(&path, SequenceSchema::none()).unwrap();
        store.save(&doc()).unwrap();
        assert!(path.exists());
    }

    #[test]
    fn failed_save_keeps_previous_document() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("db.xml");
        let store = FileStore::open(&path, SequenceSchema::collections()).unwrap();
        store.save(&doc()).unwrap();
        let before = fs::read(&path).unwrap();

        // A sequence root has no XML representation.
        assert!(store.save(&json!([1, 2, 3])).is_err());
        assert_eq!(fs::read(&path).unwrap(), before);
        assert_eq!(store.load().unwrap(), doc());
    }

    #[test]
    fn save_leaves_no_temporary_files() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::open(dir.path().join("db.yaml"), SequenceSchema::none()).unwrap();
        store.save(&doc()).unwrap();
        store.save(&doc()).unwrap();
        let entries: Vec<_> = fs::read_dir(dir.path()).unwrap().collect();
        assert_eq!(entries.len(), 1);
    }

    #[test]
    fn saved_json_is_readable_text() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("db.json");
        let store = FileStore::open(&path, SequenceSchema::none()).unwrap();
        store.save(&json!({"users": []})).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "{\n  \"users\": []\n}");
    }
}
