//! Field names and navigation of the nested lending document.
//!
//! ```text
//! <root key>
//!   borrow
//!     borrow_bookbatch: [batch]
//!       batch_id
//!       batch_books.books: [book]
//!         book_authors: [{ Authors: [author] }]
//!       batch_studentid.Student: [student]
//! ```

use polydoc_codec::{SequenceSchema, Tree};
use serde_json::{Map, Value};

use crate::error::{LibraryError, LibraryResult};

pub const BORROW: &str = "borrow";
pub const BATCHES: &str = "borrow_bookbatch";
pub const BATCH_ID: &str = "batch_id";
pub const BATCH_BOOKS: &str = "batch_books";
pub const BOOKS: &str = "books";
pub const BOOK_ID: &str = "book_id";
pub const BOOK_TITLE: &str = "book_title";
pub const BOOK_AUTHORS: &str = "book_authors";
pub const AUTHORS: &str = "Authors";
pub const AUTHOR_ID: &str = "aut_id";
pub const AUTHOR_FIRSTNAME: &str = "aut_firstname";
pub const AUTHOR_LASTNAME: &str = "aut_lastname";
pub const BATCH_STUDENTS: &str = "batch_studentid";
pub const STUDENT: &str = "Student";

/// Sequence positions of the lending document, for the codec.
pub fn sequence_schema() -> SequenceSchema {
    let batches = format!("*/{BORROW}/{BATCHES}");
    let books = format!("{batches}/{BATCH_BOOKS}/{BOOKS}");
    let groups = format!("{books}/{BOOK_AUTHORS}");
    let authors = format!("{groups}/{AUTHORS}");
    let students = format!("{batches}/{BATCH_STUDENTS}/{STUDENT}");
    SequenceSchema::new([batches, books, groups, authors, students])
}

/// The value under the single top-level key.
pub fn document(tree: &Tree) -> Option<&Value> {
    tree.as_object()?.values().next()
}

pub fn borrow(tree: &Tree) -> LibraryResult<&Value> {
    document(tree)
        .and_then(|d| d.get(BORROW))
        .filter(|b| b.is_object())
        .ok_or(LibraryError::BorrowNotFound)
}

pub fn batches(tree: &Tree) -> LibraryResult<&[Value]> {
    borrow(tree)?
        .get(BATCHES)
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .ok_or(LibraryError::BorrowNotFound)
}

pub fn batches_mut(tree: &mut Tree) -> LibraryResult<&mut Vec<Value>> {
    tree.as_object_mut()
        .and_then(|root| root.values_mut().next())
        .and_then(|d| d.get_mut(BORROW))
        .and_then(|b| b.get_mut(BATCHES))
        .and_then(Value::as_array_mut)
        .ok_or(LibraryError::BorrowNotFound)
}

pub fn batch_id(batch: &Value) -> Option<i64> {
    batch.get(BATCH_ID).and_then(Value::as_i64)
}

pub fn books(batch: &Value) -> &[Value] {
    batch
        .get(BATCH_BOOKS)
        .and_then(|b| b.get(BOOKS))
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or_default()
}

/// The book sequence of `batch`, created when the batch has none yet.
pub fn books_mut(batch: &mut Value) -> LibraryResult<&mut Vec<Value>> {
    let holder = batch
        .as_object_mut()
        .ok_or_else(|| LibraryError::Malformed("batch is not a mapping".into()))?
        .entry(BATCH_BOOKS)
        .or_insert_with(|| Value::Object(Map::new()));
    if holder.is_null() {
        *holder = Value::Object(Map::new());
    }
    let books = holder
        .as_object_mut()
        .ok_or_else(|| LibraryError::Malformed(format!("{BATCH_BOOKS} is not a mapping")))?
        .entry(BOOKS)
        .or_insert_with(|| Value::Array(Vec::new()));
    books
        .as_array_mut()
        .ok_or_else(|| LibraryError::Malformed(format!("{BOOKS} is not a sequence")))
}

/// Every author of `book`, across all of its author groups.
pub fn authors(book: &Value) -> impl Iterator<Item = &Value> {
    book.get(BOOK_AUTHORS)
        .and_then(Value::as_array)
        .into_iter()
        .flatten()
        .filter_map(|group| group.get(AUTHORS).and_then(Value::as_array))
        .flatten()
}

pub fn students(batch: &Value) -> &[Value] {
    batch
        .get(BATCH_STUDENTS)
        .and_then(|s| s.get(STUDENT))
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or_default()
}

/// Text of a scalar field; absent and null fields read as empty.
pub fn text(value: Option<&Value>) -> String {
    match value {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Null) | None => String::new(),
        Some(other) => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn schema_covers_every_sequence() {
        let schema = sequence_schema();
        let base = ["lib", BORROW, BATCHES];
        assert!(schema.is_sequence(&base));
        assert!(schema.is_sequence(&["lib", BORROW, BATCHES, BATCH_BOOKS, BOOKS]));
        assert!(schema.is_sequence(&["lib", BORROW, BATCHES, BATCH_BOOKS, BOOKS, BOOK_AUTHORS]));
        assert!(schema.is_sequence(&["lib", BORROW, BATCHES, BATCH_BOOKS, BOOKS, BOOK_AUTHORS, AUTHORS]));
        assert!(schema.is_sequence(&["lib", BORROW, BATCHES, BATCH_STUDENTS, STUDENT]));
        assert!(!schema.is_sequence(&["lib", BORROW]));
        assert!(!schema.is_sequence(&["lib", BORROW, BATCHES, BATCH_BOOKS]));
    }

    #[test]
    fn missing_sections_read_as_empty() {
        let batch = json!({"batch_id": 1});
        assert!(books(&batch).is_empty());
        assert!(students(&batch).is_empty());
        assert_eq!(authors(&json!({"book_id": 1})).count(), 0);
    }

    #[test]
    fn authors_span_all_groups() {
        let book = json!({
            "book_authors": [
                {"Authors": [{"aut_id": 1}, {"aut_id": 2}]},
                {"Authors": [{"aut_id": 3}]},
                {"Other": []}
            ]
        });
        let ids: Vec<_> = authors(&book).map(|a| a["aut_id"].clone()).collect();
        assert_eq!(ids, [json!(1), json!(2), json!(3)]);
    }

    #[test]
    fn books_mut_creates_missing_sections() {
        let mut batch = json!({"batch_id": 3});
        books_mut(&mut batch).unwrap().push(json!({"book_id": 1}));
        assert_eq!(batch, json!({"batch_id": 3, "batch_books": {"books": [{"book_id": 1}]}}));
    }

    #[test]
    fn books_mut_rejects_malformed_batch() {
        let mut batch = json!({"batch_books": "nope"});
        assert!(matches!(books_mut(&mut batch), Err(LibraryError::Malformed(_))));
    }

    #[test]
    fn text_of_scalars() {
        assert_eq!(text(Some(&json!("Cal"))), "Cal");
        assert_eq!(text(Some(&json!(7))), "7");
        assert_eq!(text(None), "");
        assert_eq!(text(Some(&Value::Null)), "");
    }
}
