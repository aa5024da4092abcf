//! Projections over the nested book-batch lending document.
//!
//! The document has a single root key whose `borrow` section holds a
//! sequence of batches; each batch carries books (with author groups) and
//! students. [`Projections`] computes read-only views and the one mutation
//! (adding a book to a batch) on a loaded tree; [`LibraryService`] runs them
//! against a [`DocumentStore`](polydoc_store::DocumentStore).
//!
//! Codecs for this shape must be built with [`sequence_schema`] so that a
//! single batch, book or author decoded from XML still reads as a sequence.

pub mod error;
pub mod projection;
pub mod seed;
pub mod service;
pub mod shape;

pub use error::{LibraryError, LibraryResult};
pub use projection::{AuthorName, BatchView, BookView, Projections, FULL_NAME};
pub use seed::{seed_document, SEED_ROOT};
pub use service::LibraryService;
pub use shape::sequence_schema;
