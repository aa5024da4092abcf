use std::collections::HashSet;

use polydoc_codec::Tree;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::{LibraryError, LibraryResult};
use crate::shape::{self, AUTHOR_FIRSTNAME, AUTHOR_ID, AUTHOR_LASTNAME, BOOK_ID, BOOK_TITLE};

/// Field added to author records by [`Projections::list_all_authors`].
pub const FULL_NAME: &str = "full_name";

/// A batch reshaped for display.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct BatchView {
    pub batch_id: Value,
    pub books: Vec<BookView>,
    /// First student of the batch, or null.
    pub student: Value,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct BookView {
    pub book_id: Value,
    pub book_title: Value,
    pub authors: Vec<AuthorName>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct AuthorName {
    pub aut_id: Value,
    pub name: String,
}

/// Deterministic read-only views over the lending document.
pub struct Projections;

impl Projections {
    /// The `borrow` section as stored.
    pub fn borrow(tree: &Tree) -> LibraryResult<&Value> {
        shape::borrow(tree)
    }

    pub fn list_batches(tree: &Tree) -> LibraryResult<Vec<BatchView>> {
        Ok(shape::batches(tree)?.iter().map(batch_view).collect())
    }

    /// The batch whose `batch_id` equals `batch_id`, reshaped.
    pub fn get_batch(tree: &Tree, batch_id: i64) -> LibraryResult<BatchView> {
        shape::batches(tree)?
            .iter()
            .find(|b| shape::batch_id(b) == Some(batch_id))
            .map(batch_view)
            .ok_or_else(|| LibraryError::BatchNotFound(batch_id.to_string()))
    }

    /// Every distinct author in first-seen order, with `full_name` added.
    ///
    /// Authors are the same when id, first name and last name all agree.
    pub fn list_all_authors(tree: &Tree) -> LibraryResult<Vec<Value>> {
        let mut seen = HashSet::new();
        let mut out = Vec::new();
        for batch in shape::batches(tree)? {
            for book in shape::books(batch) {
                for author in shape::authors(book) {
                    let key = (
                        author.get(AUTHOR_ID).map(Value::to_string).unwrap_or_default(),
                        shape::text(author.get(AUTHOR_FIRSTNAME)),
                        shape::text(author.get(AUTHOR_LASTNAME)),
                    );
                    if !seen.insert(key) {
                        continue;
                    }
                    let mut record = author.as_object().cloned().unwrap_or_else(Map::new);
                    record.insert(FULL_NAME.to_string(), Value::String(full_name(author)));
                    out.push(Value::Object(record));
                }
            }
        }
        Ok(out)
    }

    /// Every book of every batch as stored; duplicates are kept.
    pub fn list_all_books(tree: &Tree) -> LibraryResult<Vec<Value>> {
        Ok(shape::batches(tree)?
            .iter()
            .flat_map(shape::books)
            .cloned()
            .collect())
    }

    /// Every student of every batch as stored; duplicates are kept.
    pub fn list_all_students(tree: &Tree) -> LibraryResult<Vec<Value>> {
        Ok(shape::batches(tree)?
            .iter()
            .flat_map(shape::students)
            .cloned()
            .collect())
    }

    /// Append `book` to the batch and return it.
    pub fn add_book_to_batch(tree: &mut Tree, batch_id: i64, book: Value) -> LibraryResult<Value> {
        if !book.is_object() {
            return Err(LibraryError::InvalidBook("expected a JSON object".into()));
        }
        let batch = shape::batches_mut(tree)?
            .iter_mut()
            .find(|b| shape::batch_id(b) == Some(batch_id))
            .ok_or_else(|| LibraryError::BatchNotFound(batch_id.to_string()))?;
        shape::books_mut(batch)?.push(book.clone());
        Ok(book)
    }
}

fn batch_view(batch: &Value) -> BatchView {
    BatchView {
        batch_id: field(batch, shape::BATCH_ID),
        books: shape::books(batch).iter().map(book_view).collect(),
        student: shape::students(batch).first().cloned().unwrap_or(Value::Null),
    }
}

fn book_view(book: &Value) -> BookView {
    BookView {
        book_id: field(book, BOOK_ID),
        book_title: field(book, BOOK_TITLE),
        authors: shape::authors(book)
            .map(|a| AuthorName {
                aut_id: field(a, AUTHOR_ID),
                name: full_name(a),
            })
            .collect(),
    }
}

fn field(value: &Value, key: &str) -> Value {
    value.get(key).cloned().unwrap_or(Value::Null)
}

/// `first last`, joining only the parts that are non-empty; a missing first
/// name yields `last` alone rather than a leading space.
fn full_name(author: &Value) -> String {
    let first = shape::text(author.get(AUTHOR_FIRSTNAME));
    let last = shape::text(author.get(AUTHOR_LASTNAME));
    match (first.is_empty(), last.is_empty()) {
        (false, false) => format!("{first} {last}"),
        (false, true) => first,
        _ => last,
    }
}
