//! Generic CRUD over the record collections of a polydoc document.
//!
//! A collection is any root-level key whose value is a sequence of records,
//! and a record is a mapping with a unique `id`. [`Collections`] implements
//! the operations on a loaded tree; [`CollectionService`] wraps them in the
//! load-mutate-save cycle of a [`DocumentStore`](polydoc_store::DocumentStore).

pub mod engine;
pub mod error;
pub mod record;
pub mod service;

pub use engine::Collections;
pub use error::{CollectionError, Result};
pub use record::{RecordId, ID_FIELD};
pub use service::CollectionService;
