use serde_json::Value;

use crate::Tree;

/// Wildcard segment matching any mapping key.
pub const ANY_KEY: &str = "*";

/// Key paths whose values are always sequences in the canonical tree.
///
/// A path is a list of mapping keys from the root. Sequence elements are
/// transparent: `books/book_authors` matches the `book_authors` field of every
/// element of `books`. A `*` segment matches any key.
///
/// XML cannot tell a one-element sequence from a single value.
/// [`SequenceSchema::normalize`] restores the sequence at every known
/// position: a lone value becomes a one-element sequence and a null becomes
/// an empty one.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SequenceSchema {
    paths: Vec<Vec<String>>,
}

impl SequenceSchema {
    /// Build a schema from `/`-separated key paths.
    pub fn new<I, S>(paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let paths = paths
            .into_iter()
            .map(|p| {
                p.as_ref()
                    .split('/')
                    .filter(|s| !s.is_empty())
                    .map(str::to_string)
                    .collect::<Vec<_>>()
            })
            .filter(|p| !p.is_empty())
            .collect();
        Self { paths }
    }

    /// No known sequence positions.
    pub fn none() -> Self {
        Self::default()
    }

    /// Every root key holds a sequence (the collections layout).
    pub fn collections() -> Self {
        Self::new([ANY_KEY])
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    /// Whether the value at `path` must be a sequence.
    pub fn is_sequence<S: AsRef<str>>(&self, path: &[S]) -> bool {
        self.paths
            .iter()
            .any(|p| p.len() == path.len() && segments_match(p, path))
    }

    fn reaches<S: AsRef<str>>(&self, path: &[S]) -> bool {
        self.paths
            .iter()
            .any(|p| p.len() > path.len() && segments_match(&p[..path.len()], path))
    }

    /// Rewrite every known sequence position of `tree` into a sequence.
    pub fn normalize(&self, tree: &mut Tree) {
        if self.is_empty() {
            return;
        }
        let mut path = Vec::new();
        self.walk(tree, &mut path);
    }

    fn walk(&self, value: &mut Value, path: &mut Vec<String>) {
        match value {
            Value::Object(map) => {
                for (key, child) in map.iter_mut() {
                    path.push(key.clone());
                    if self.is_sequence(path.as_slice()) {
                        force_sequence(child);
                    }
                    if self.reaches(path.as_slice()) {
                        self.walk(child, path);
                    }
                    path.pop();
                }
            }
            Value::Array(items) => {
                for item in items {
                    self.walk(item, path);
                }
            }
            _ => {}
        }
    }
}

fn segments_match<S: AsRef<str>>(pattern: &[String], path: &[S]) -> bool {
    pattern
        .iter()
        .zip(path)
        .all(|(p, k)| p == ANY_KEY || p == k.as_ref())
}

fn force_sequence(value: &mut Value) {
    match value {
        Value::Array(_) => {}
        Value::Null => *value = Value::Array(Vec::new()),
        other => {
            let single = other.take();
            *other = Value::Array(vec![single]);
        }
    }
}
