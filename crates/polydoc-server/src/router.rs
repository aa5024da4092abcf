use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use polydoc_collections::CollectionService;
use polydoc_library::LibraryService;
use polydoc_store::DocumentStore;
use tower_http::trace::TraceLayer;

use crate::config::Mode;
use crate::handler;

/// Build the router for `mode` over `store`.
pub fn build_router(mode: Mode, store: Arc<dyn DocumentStore>) -> Router {
    let router = match mode {
        Mode::Collections => collections_router(store),
        Mode::Library => library_router(store),
    };
    router.layer(TraceLayer::new_for_http())
}

/// CRUD over every root-level collection; each first path segment names one.
pub fn collections_router(store: Arc<dyn DocumentStore>) -> Router {
    Router::new()
        .route(
            "/:collection",
            get(handler::list_records).post(handler::insert_record),
        )
        .route(
            "/:collection/:id",
            get(handler::get_record)
                .put(handler::replace_record)
                .patch(handler::merge_record)
                .delete(handler::delete_record),
        )
        .with_state(CollectionService::new(store))
}

pub fn library_router(store: Arc<dyn DocumentStore>) -> Router {
    Router::new()
        .route("/", get(handler::document))
        .route("/borrow", get(handler::borrow))
        .route("/book_batches/books", get(handler::list_batches))
        .route("/book_batches/aut_id", get(handler::list_authors))
        .route("/book_batches/:batch_id", get(handler::get_batch))
        .route("/book_batches/:batch_id/books", post(handler::add_book))
        .route("/books", get(handler::list_books))
        .route("/students", get(handler::list_students))
        .with_state(LibraryService::new(store))
}
