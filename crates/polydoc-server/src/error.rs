use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use polydoc_collections::CollectionError;
use polydoc_library::LibraryError;
use polydoc_store::StoreError;
use serde_json::json;
use thiserror::Error;
use tracing::warn;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error(transparent)]
    Collection(#[from] CollectionError),

    #[error(transparent)]
    Library(#[from] LibraryError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("invalid request body: {0}")]
    Body(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("internal error: {0}")]
    Internal(String),
}

impl ServerError {
    /// 404 for every absent collection, record, batch or document; 500 otherwise.
    pub fn status(&self) -> StatusCode {
        let not_found = match self {
            Self::Collection(e) => e.is_not_found(),
            Self::Library(e) => e.is_not_found(),
            Self::Store(e) => e.is_not_found(),
            Self::Body(_) | Self::Config(_) | Self::Io(_) | Self::Internal(_) => false,
        };
        if not_found {
            StatusCode::NOT_FOUND
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }

    fn logged(&self) -> StatusCode {
        let status = self.status();
        warn!(status = status.as_u16(), error = %self, "request failed");
        status
    }
}

pub type ServerResult<T> = Result<T, ServerError>;

/// Error rendered as a plain-text body.
#[derive(Debug)]
pub struct TextError(pub ServerError);

impl<E: Into<ServerError>> From<E> for TextError {
    fn from(e: E) -> Self {
        Self(e.into())
    }
}

impl IntoResponse for TextError {
    fn into_response(self) -> Response {
        (self.0.logged(), self.0.to_string()).into_response()
    }
}

/// Error rendered as `{"error": message}`.
#[derive(Debug)]
pub struct JsonError(pub ServerError);

impl<E: Into<ServerError>> From<E> for JsonError {
    fn from(e: E) -> Self {
        Self(e.into())
    }
}

impl IntoResponse for JsonError {
    fn into_response(self) -> Response {
        (self.0.logged(), Json(json!({ "error": self.0.to_string() }))).into_response()
    }
}
