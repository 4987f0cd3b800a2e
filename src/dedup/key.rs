//! Deduplication key derivation.
//!
//! A key is built from an ordered list of dot-delimited field paths. Values are
//! serialized canonically (objects with sorted keys) so that two records with
//! the same content produce the same key regardless of field order.

use crate::dataset::Record;
use serde_json::Value;
use std::fmt;

/// Token substituted for a path that does not resolve. Not valid JSON.
pub const ABSENT_MARKER: &str = "∅";

const PART_SEPARATOR: &str = "|";

/// A dot-delimited path to a possibly nested field, e.g. `meta.owner.name`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FieldPath {
    raw: String,
    segments: Vec<String>,
}

impl FieldPath {
    pub fn parse(path: &str) -> Self {
        Self {
            raw: path.to_string(),
            segments: path.split('.').map(str::to_string).collect(),
        }
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Resolve this path against a record.
    ///
    /// Each segment is an exact key lookup in the current object. Returns `None`
    /// (absent) when a segment is missing or the current value is not an
    /// object. A present JSON `null` resolves to `Some(&Value::Null)`.
    pub fn resolve<'a>(&self, record: &'a Record) -> Option<&'a Value> {
        let (first, rest) = self.segments.split_first()?;
        let mut current = record.get(first)?;
        for segment in rest {
            current = current.as_object()?.get(segment)?;
        }
        Some(current)
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.raw)
    }
}

/// Parse a list of path strings, preserving order.
pub fn parse_field_paths<S: AsRef<str>>(paths: &[S]) -> Vec<FieldPath> {
    paths.iter().map(|p| FieldPath::parse(p.as_ref())).collect()
}

/// Deterministic JSON text for a value: object keys are emitted in sorted order
/// at every depth, arrays keep their element order.
pub fn canonical_json(value: &Value) -> String {
    let mut out = String::new();
    write_canonical(value, &mut out);
    out
}

fn write_canonical(value: &Value, out: &mut String) {
    match value {
        Value::Object(map) => write_canonical_object(map, out),
        Value::Array(items) => {
            out.push('[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                write_canonical(item, out);
            }
            out.push(']');
        }
        scalar => out.push_str(&scalar.to_string()),
    }
}

fn write_canonical_object(map: &Record, out: &mut String) {
    let mut keys: Vec<&String> = map.keys().collect();
    keys.sort();
    out.push('{');
    for (i, key) in keys.into_iter().enumerate() {
        if i > 0 {
            out.push(',');
        }
        out.push_str(&Value::String(key.clone()).to_string());
        out.push(':');
        write_canonical(&map[key], out);
    }
    out.push('}');
}

/// Build the dedup key of a record.
///
/// With no field paths the key is the canonical serialization of the whole
/// record. Otherwise it is `path=value` for each path in configured order,
/// joined by `|`, with [`ABSENT_MARKER`] standing in for unresolved paths.
pub fn build_key(record: &Record, fields: &[FieldPath]) -> String {
    if fields.is_empty() {
        let mut out = String::new();
        write_canonical_object(record, &mut out);
        return out;
    }

    fields
        .iter()
        .map(|field| {
            let serialized = match field.resolve(record) {
                Some(value) => canonical_json(value),
                None => ABSENT_MARKER.to_string(),
            };
            format!("{}={}", field, serialized)
        })
        .collect::<Vec<_>>()
        .join(PART_SEPARATOR)
}
