use crate::dataset::{value_as_key_string, Record};
use crate::output::writer::{render_json, FileError, RenderedFile};
use serde_json::{Map, Value};
use std::path::Path;

/// Project records into a key-value mapping keyed by a top-level field.
///
/// Records whose key field is missing or null are skipped. When two records
/// map to the same key the later one wins.
pub fn project_kv(items: &[Record], key_field: &str) -> Map<String, Value> {
    let mut kv = Map::new();
    for item in items {
        match item.get(key_field) {
            None | Some(Value::Null) => continue,
            Some(key) => {
                kv.insert(value_as_key_string(key), Value::Object(item.clone()));
            }
        }
    }
    kv
}

/// Render the projection for `path`, ready to be written.
pub fn render_kv(path: &Path, items: &[Record], key_field: &str) -> Result<RenderedFile, FileError> {
    render_json(path, &project_kv(items, key_field))
}
