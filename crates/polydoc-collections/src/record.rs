//! Record identifiers.

use std::fmt;
use std::str::FromStr;

use serde_json::Value;

/// Field every record carries.
pub const ID_FIELD: &str = "id";

/// A record id as supplied by a caller, usually a URL path segment.
///
/// Matching is loose: `"1"` addresses a record stored with `id: 1` and one
/// stored with `id: "1"`. When written into a record the id becomes an
/// integer if it parses as one and a string otherwise.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct RecordId {
    raw: String,
    int: Option<i64>,
}

impl RecordId {
    pub fn parse(raw: &str) -> Self {
        Self {
            raw: raw.to_string(),
            int: raw.trim().parse().ok(),
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        self.int
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Value written into the `id` field of a record.
    pub fn to_value(&self) -> Value {
        match self.int {
            Some(n) => Value::from(n),
            None => Value::String(self.raw.clone()),
        }
    }

    /// Whether a stored `id` value addresses this id.
    pub fn matches(&self, value: &Value) -> bool {
        match value {
            Value::Number(n) => match (self.int, n.as_i64()) {
                (Some(a), Some(b)) => a == b,
                _ => self
                    .raw
                    .trim()
                    .parse::<f64>()
                    .ok()
                    .zip(n.as_f64())
                    .is_some_and(|(a, b)| a == b),
            },
            Value::String(s) => *s == self.raw,
            _ => false,
        }
    }
}

impl From<i64> for RecordId {
    fn from(n: i64) -> Self {
        Self {
            raw: n.to_string(),
            int: Some(n),
        }
    }
}

impl FromStr for RecordId {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::parse(s))
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

/// Integer value of a stored `id`, accepting numeric strings.
pub fn integer_id(record: &Value) -> Option<i64> {
    match record.get(ID_FIELD)? {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn numeric_path_matches_number_and_string() {
        let id = RecordId::parse("7");
        assert!(id.matches(&json!(7)));
        assert!(id.matches(&json!("7")));
        assert!(!id.matches(&json!(8)));
        assert!(!id.matches(&json!(null)));
    }

    #[test]
    fn loose_numeric_forms() {
        assert!(RecordId::parse("07").matches(&json!(7)));
        assert!(RecordId::parse("7.0").matches(&json!(7)));
        assert!(!RecordId::parse("07").matches(&json!("7")));
    }

    #[test]
    fn text_ids() {
        let id = RecordId::parse("abc");
        assert!(id.matches(&json!("abc")));
        assert!(!id.matches(&json!(0)));
        assert_eq!(id.to_value(), json!("abc"));
    }

    #[test]
    fn written_value_is_integer_when_possible() {
        assert_eq!(RecordId::parse("12").to_value(), json!(12));
        assert_eq!(RecordId::from(3).to_value(), json!(3));
        assert_eq!("5".parse::<RecordId>().unwrap().as_i64(), Some(5));
    }

    #[test]
    fn integer_id_reads_numbers_and_numeric_strings() {
        assert_eq!(integer_id(&json!({"id": 4})), Some(4));
        assert_eq!(integer_id(&json!({"id": "9"})), Some(9));
        assert_eq!(integer_id(&json!({"id": "x"})), None);
        assert_eq!(integer_id(&json!({"name": "no id"})), None);
    }
}
