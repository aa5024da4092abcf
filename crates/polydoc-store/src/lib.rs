//! Whole-document storage for polydoc.
//!
//! A store owns one document in one encoding. Every operation loads the full
//! tree from the backing bytes and every mutation writes the full tree back;
//! there is no cache and no partial write.
//!
//! # Storage Backends
//!
//! All backends implement the [`DocumentStore`] trait:
//!
//! - [`FileStore`] -- a single file, encoding chosen by extension, saved
//!   through a temporary file and an atomic rename
//! - [`InMemoryStore`] -- encoded bytes held in memory for tests and embedding
//!
//! # Design Rules
//!
//! 1. The file is the single source of truth; nothing survives between calls.
//! 2. Saves are all-or-nothing: a failed save leaves the old document intact.
//! 3. [`update`] serializes load-mutate-save windows within one process.
//!    Writers in other processes are not coordinated with (last writer wins).
//! 4. Seeding is an explicit step ([`bootstrap`]), never a side effect of
//!    [`DocumentStore::load`].
//! 5. All I/O and codec errors are propagated, never silently ignored.

pub mod error;
pub mod file;
pub mod memory;
pub mod ops;
pub mod traits;

pub use error::{StoreError, StoreResult};
pub use file::FileStore;
pub use memory::InMemoryStore;
pub use ops::{bootstrap, update};
pub use traits::DocumentStore;
