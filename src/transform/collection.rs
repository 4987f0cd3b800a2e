use crate::dataset::{value_as_key_string, Record};
use serde_json::Value;

/// Stable ascending sort by the string form of each record's `id`.
///
/// Records with a missing or null `id` sort as the empty string, so they come
/// first and keep their relative order.
pub fn sort_by_id(mut items: Vec<Record>) -> Vec<Record> {
    items.sort_by_cached_key(sort_key);
    items
}

fn sort_key(record: &Record) -> String {
    match record.get("id") {
        None | Some(Value::Null) => String::new(),
        Some(id) => value_as_key_string(id),
    }
}
