//! Error types for collection operations.

use polydoc_store::StoreError;
use thiserror::Error;

/// Errors that can occur during collection operations.
#[derive(Debug, Error)]
pub enum CollectionError {
    /// The root mapping has no sequence under this name.
    #[error("collection not found: {name}")]
    CollectionNotFound { name: String },

    /// No record in the collection carries this id.
    #[error("item not found: {collection}/{id}")]
    RecordNotFound { collection: String, id: String },

    /// The request body is not a record.
    #[error("invalid record payload: {0}")]
    InvalidPayload(String),

    /// The largest id in the collection leaves no room for another.
    #[error("no ids left in collection {collection}")]
    IdsExhausted { collection: String },

    /// Loading or saving the document failed.
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl CollectionError {
    /// Whether the addressed collection, record or document is absent.
    pub fn is_not_found(&self) -> bool {
        match self {
            Self::CollectionNotFound { .. } | Self::RecordNotFound { .. } => true,
            Self::Store(e) => e.is_not_found(),
            Self::InvalidPayload(_) | Self::IdsExhausted { .. } => false,
        }
    }
}

/// Convenience type alias for collection operations.
pub type Result<T> = std::result::Result<T, CollectionError>;
