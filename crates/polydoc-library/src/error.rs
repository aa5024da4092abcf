use polydoc_store::StoreError;

/// Errors produced by library projections.
#[derive(Debug, thiserror::Error)]
pub enum LibraryError {
    #[error("borrow data not found")]
    BorrowNotFound,

    #[error("batch not found: {0}")]
    BatchNotFound(String),

    #[error("invalid book payload: {0}")]
    InvalidBook(String),

    #[error("malformed library document: {0}")]
    Malformed(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl LibraryError {
    /// Whether the addressed batch, borrow section or document is absent.
    pub fn is_not_found(&self) -> bool {
        match self {
            Self::BorrowNotFound | Self::BatchNotFound(_) => true,
            Self::Store(e) => e.is_not_found(),
            Self::InvalidBook(_) | Self::Malformed(_) => false,
        }
    }
}

pub type LibraryResult<T> = Result<T, LibraryError>;
