//! HTTP server for polydoc.
//!
//! Serves one document file in one of two modes: generic CRUD over
//! root-level collections, or read-only projections (plus add-book) over the
//! nested library document. Every request loads the file on the blocking
//! pool; mutations write it back before responding.

pub mod config;
pub mod error;
pub mod extract;
pub mod handler;
pub mod router;
pub mod server;

pub use config::{Mode, ServerConfig};
pub use error::{JsonError, ServerError, ServerResult, TextError};
pub use router::build_router;
pub use server::PolydocServer;
