use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::Json;
use polydoc_collections::{CollectionService, RecordId};
use polydoc_library::{BatchView, LibraryError, LibraryService};
use polydoc_store::DocumentStore;
use serde::Serialize;
use serde_json::Value;

use crate::error::{JsonError, ServerError, TextError};
use crate::extract::{JsonBody, TextBody};

pub type Records = CollectionService<dyn DocumentStore>;
pub type Library = LibraryService<dyn DocumentStore>;

/// Run store work on the blocking pool.
async fn blocking<T, E, F>(work: F) -> Result<T, ServerError>
where
    F: FnOnce() -> Result<T, E> + Send + 'static,
    T: Send + 'static,
    E: Into<ServerError> + Send + 'static,
{
    tokio::task::spawn_blocking(work)
        .await
        .map_err(|e| ServerError::Internal(e.to_string()))?
        .map_err(Into::into)
}

// --- collections ---

pub async fn list_records(
    State(svc): State<Records>,
    Path(collection): Path<String>,
) -> Result<Json<Vec<Value>>, TextError> {
    Ok(Json(blocking(move || svc.list(&collection)).await?))
}

pub async fn get_record(
    State(svc): State<Records>,
    Path((collection, id)): Path<(String, String)>,
) -> Result<Json<Value>, TextError> {
    let id = RecordId::parse(&id);
    Ok(Json(blocking(move || svc.get(&collection, &id)).await?))
}

pub async fn insert_record(
    State(svc): State<Records>,
    Path(collection): Path<String>,
    TextBody(payload): TextBody,
) -> Result<(StatusCode, Json<Value>), TextError> {
    let record = blocking(move || svc.insert(&collection, payload)).await?;
    Ok((StatusCode::CREATED, Json(record)))
}

pub async fn replace_record(
    State(svc): State<Records>,
    Path((collection, id)): Path<(String, String)>,
    TextBody(payload): TextBody,
) -> Result<Json<Value>, TextError> {
    let id = RecordId::parse(&id);
    Ok(Json(blocking(move || svc.replace(&collection, &id, payload)).await?))
}

pub async fn merge_record(
    State(svc): State<Records>,
    Path((collection, id)): Path<(String, String)>,
    TextBody(payload): TextBody,
) -> Result<Json<Value>, TextError> {
    let id = RecordId::parse(&id);
    Ok(Json(blocking(move || svc.merge(&collection, &id, payload)).await?))
}

pub async fn delete_record(
    State(svc): State<Records>,
    Path((collection, id)): Path<(String, String)>,
) -> Result<Json<Value>, TextError> {
    let id = RecordId::parse(&id);
    Ok(Json(blocking(move || svc.delete(&collection, &id)).await?))
}

// --- library ---

/// Success body of the library endpoints.
#[derive(Debug, Serialize)]
pub struct Envelope<T> {
    pub success: bool,
    pub data: T,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<usize>,
}

impl<T> Envelope<T> {
    fn one(data: T) -> Json<Self> {
        Json(Self { success: true, data, count: None })
    }
}

impl<T> Envelope<Vec<T>> {
    fn many(data: Vec<T>) -> Json<Self> {
        let count = Some(data.len());
        Json(Self { success: true, data, count })
    }
}

type Reply<T> = Result<Json<Envelope<T>>, JsonError>;

fn parse_batch_id(raw: &str) -> Result<i64, LibraryError> {
    raw.trim()
        .parse()
        .map_err(|_| LibraryError::BatchNotFound(raw.to_string()))
}

pub async fn document(State(svc): State<Library>) -> Reply<Value> {
    Ok(Envelope::one(blocking(move || svc.document()).await?))
}

pub async fn borrow(State(svc): State<Library>) -> Reply<Value> {
    Ok(Envelope::one(blocking(move || svc.borrow()).await?))
}

pub async fn list_batches(State(svc): State<Library>) -> Reply<Vec<BatchView>> {
    Ok(Envelope::many(blocking(move || svc.list_batches()).await?))
}

pub async fn get_batch(State(svc): State<Library>, Path(batch_id): Path<String>) -> Reply<BatchView> {
    let batch_id = parse_batch_id(&batch_id)?;
    Ok(Envelope::one(blocking(move || svc.get_batch(batch_id)).await?))
}

pub async fn list_authors(State(svc): State<Library>) -> Reply<Vec<Value>> {
    Ok(Envelope::many(blocking(move || svc.list_all_authors()).await?))
}

pub async fn list_books(State(svc): State<Library>) -> Reply<Vec<Value>> {
    Ok(Envelope::many(blocking(move || svc.list_all_books()).await?))
}

pub async fn list_students(State(svc): State<Library>) -> Reply<Vec<Value>> {
    Ok(Envelope::many(blocking(move || svc.list_all_students()).await?))
}

pub async fn add_book(
    State(svc): State<Library>,
    Path(batch_id): Path<String>,
    JsonBody(book): JsonBody,
) -> Result<(StatusCode, Json<Envelope<Value>>), JsonError> {
    let batch_id = parse_batch_id(&batch_id)?;
    let book = blocking(move || svc.add_book_to_batch(batch_id, book)).await?;
    Ok((StatusCode::CREATED, Envelope::one(book)))
}
