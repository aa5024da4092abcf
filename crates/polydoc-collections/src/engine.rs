//! Pure CRUD operations on a loaded document.
//!
//! A collection is a root-level key holding a sequence of records; a record
//! is a mapping with an `id`. None of these functions touch storage.

use serde_json::{Map, Value};

use crate::error::{CollectionError, Result};
use crate::record::{integer_id, RecordId, ID_FIELD};
use polydoc_codec::Tree;

/// CRUD operations over the collections of a document tree.
pub struct Collections;

impl Collections {
    /// All records of `name`, in stored order.
    pub fn list<'a>(tree: &'a Tree, name: &str) -> Result<&'a [Value]> {
        tree.get(name)
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .ok_or_else(|| not_found(name))
    }

    /// The first record of `name` whose id matches `id`.
    pub fn get<'a>(tree: &'a Tree, name: &str, id: &RecordId) -> Result<&'a Value> {
        let records = Self::list(tree, name)?;
        records
            .iter()
            .find(|r| has_id(r, id))
            .ok_or_else(|| record_not_found(name, id))
    }

    /// The id the next inserted record of `records` receives: one more than
    /// the largest integer id, or 1 for an empty collection. Gaps left by
    /// deletions are never reused. `None` once the largest id is `i64::MAX`.
    pub fn next_id(records: &[Value]) -> Option<i64> {
        match records.iter().filter_map(integer_id).max() {
            Some(max) => max.checked_add(1),
            None => Some(1),
        }
    }

    /// Append `payload` with a freshly assigned id and return the stored record.
    pub fn insert(tree: &mut Tree, name: &str, payload: Value) -> Result<Value> {
        let records = collection_mut(tree, name)?;
        let mut record = into_record(payload)?;
        let id = Self::next_id(records)
            .ok_or_else(|| CollectionError::IdsExhausted { collection: name.to_string() })?;
        record.insert(ID_FIELD.to_string(), Value::from(id));
        let record = Value::Object(record);
        records.push(record.clone());
        Ok(record)
    }

    /// Substitute `payload` for the record wholesale, keeping the addressed id.
    pub fn replace(tree: &mut Tree, name: &str, id: &RecordId, payload: Value) -> Result<Value> {
        let records = collection_mut(tree, name)?;
        let index = position(records, name, id)?;
        let mut record = into_record(payload)?;
        record.insert(ID_FIELD.to_string(), id.to_value());
        records[index] = Value::Object(record);
        Ok(records[index].clone())
    }

    /// Shallow-merge `payload` over the record, keeping the addressed id.
    pub fn merge(tree: &mut Tree, name: &str, id: &RecordId, payload: Value) -> Result<Value> {
        let records = collection_mut(tree, name)?;
        let index = position(records, name, id)?;
        let patch = into_record(payload)?;
        if !records[index].is_object() {
            records[index] = Value::Object(Map::new());
        }
        if let Value::Object(record) = &mut records[index] {
            record.extend(patch);
            record.insert(ID_FIELD.to_string(), id.to_value());
        }
        Ok(records[index].clone())
    }

    /// Remove the record and return it.
    pub fn delete(tree: &mut Tree, name: &str, id: &RecordId) -> Result<Value> {
        let records = collection_mut(tree, name)?;
        let index = position(records, name, id)?;
        Ok(records.remove(index))
    }
}

fn has_id(record: &Value, id: &RecordId) -> bool {
    record.get(ID_FIELD).is_some_and(|v| id.matches(v))
}

fn collection_mut<'a>(tree: &'a mut Tree, name: &str) -> Result<&'a mut Vec<Value>> {
    tree.get_mut(name)
        .and_then(Value::as_array_mut)
        .ok_or_else(|| not_found(name))
}

fn position(records: &[Value], name: &str, id: &RecordId) -> Result<usize> {
    records
        .iter()
        .position(|r| has_id(r, id))
        .ok_or_else(|| record_not_found(name, id))
}

fn into_record(payload: Value) -> Result<Map<String, Value>> {
    match payload {
        Value::Object(map) => Ok(map),
        other => Err(CollectionError::InvalidPayload(format!(
            "expected a JSON object, got {}",
            kind(&other)
        ))),
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

fn not_found(name: &str) -> CollectionError {
    CollectionError::CollectionNotFound { name: name.to_string() }
}

fn record_not_found(name: &str, id: &RecordId) -> CollectionError {
    CollectionError::RecordNotFound {
        collection: name.to_string(),
        id: id.to_string(),
    }
}
