use itertools::Itertools;
use serde_json::{Map, Value};

/// Structural view of a record: fields are looked up by name, not by type.
pub trait Record {
    /// Value of the named field, `None` if the record has no such field.
    fn field(&self, name: &str) -> Option<Value>;

    fn is_empty(&self) -> bool;
}

impl Record for Map<String, Value> {
    fn field(&self, name: &str) -> Option<Value> {
        self.get(name).cloned()
    }

    fn is_empty(&self) -> bool {
        Map::is_empty(self)
    }
}

/// Keeps the first record seen for every distinct combination of the values of `keys`.
///
/// Records are returned untouched when `keys` is empty, or when no record carries all
/// of `keys`. The one exception is a list made only of empty records with no keys
/// requested, which collapses into a single empty record. A field missing on a record
/// compares equal to an explicit `null`, and numeric field values compare by value
/// (`1` equals `1.0`). Numbers nested inside arrays or objects are compared as written.
pub fn unique_by_keys<R: Record>(records: Vec<R>, keys: &[&str]) -> Vec<R> {
    if keys.is_empty() {
        if !records.is_empty() && records.iter().all(Record::is_empty) {
            return records.into_iter().take(1).collect();
        }
        return records;
    }

    let attributable = records
        .iter()
        .any(|record| keys.iter().all(|key| record.field(key).is_some()));
    if !attributable {
        return records;
    }

    records
        .into_iter()
        .unique_by(|record| composite_key(record, keys))
        .collect()
}

// serde_json::Value is not Hash, its compact rendering is used instead.
// Top-level numbers go through f64 so that 1 and 1.0 are the same key.
fn composite_key<R: Record>(record: &R, keys: &[&str]) -> Vec<String> {
    keys.iter()
        .map(|key| match record.field(key).unwrap_or(Value::Null) {
            Value::Number(n) => n.as_f64().map_or_else(|| n.to_string(), |f| f.to_string()),
            other => other.to_string(),
        })
        .collect()
}
