//! Codecs for polydoc documents.
//!
//! A document lives on disk as JSON, YAML or XML and in memory as one
//! canonical [`Tree`]: a `serde_json::Value` whose mappings keep insertion
//! order. Each [`Encoding`] converts both ways. JSON and YAML are decoded as
//! written; after an XML decode, [`SequenceSchema`] restores the sequences
//! XML cannot express unambiguously.
//!
//! # Known limitations of the XML mapping
//!
//! - At positions the schema does not know, a one-element sequence reads
//!   back as its single element and an empty sequence reads back as null.
//! - Strings whose text is the canonical form of a number or boolean carry a
//!   `polydoc:type="string"` attribute; a foreign file without it reads such
//!   text as the number or boolean.
//! - At known sequence positions of the collections layout, any root value
//!   reads back as a sequence.
//! - An empty mapping below the root reads back as an empty string.

pub mod codec;
pub mod encoding;
pub mod error;
pub mod schema;
pub mod xml;

pub use codec::{decode, encode, Codec};
pub use encoding::Encoding;
pub use error::{CodecError, CodecResult};
pub use schema::SequenceSchema;

/// The canonical in-memory document.
pub type Tree = serde_json::Value;
