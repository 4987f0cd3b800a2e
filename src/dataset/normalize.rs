use crate::dataset::record::{Batch, Record};
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Debug, Error)]
pub enum InputError {
    #[error("input JSON must be an array, found {found}")]
    NotAnArray { found: &'static str },
}

/// The two top-level input layouts the pipeline accepts.
///
/// Shape is decided once, here. Everything downstream only sees `Batch`es.
#[derive(Debug, Clone, PartialEq)]
pub enum InputShape {
    /// `[{datasetId?, datasetOffset?, items: [...]}, ...]`
    Batches(Vec<Value>),
    /// `[record, record, ...]`
    Flat(Vec<Value>),
}

impl InputShape {
    /// Recognize the shape of a parsed input document.
    ///
    /// The input is batch-shaped when its first element is an object with an
    /// array-valued `items` field. Any non-array document is rejected.
    pub fn detect(input: Value) -> Result<Self, InputError> {
        let entries = match input {
            Value::Array(entries) => entries,
            other => {
                return Err(InputError::NotAnArray {
                    found: json_type_name(&other),
                })
            }
        };

        let looks_like_batches = entries
            .first()
            .and_then(|first| first.get("items"))
            .map(Value::is_array)
            .unwrap_or(false);

        if looks_like_batches {
            Ok(InputShape::Batches(entries))
        } else {
            Ok(InputShape::Flat(entries))
        }
    }

    /// Build the canonical batch list.
    ///
    /// `fallback_id` names the implicit batch of a flat input and prefixes the
    /// generated ids (`<fallback>-<index>`) of batch entries lacking one.
    pub fn into_batches(self, fallback_id: Option<&str>) -> Vec<Batch> {
        match self {
            InputShape::Batches(entries) => entries
                .into_iter()
                .enumerate()
                .map(|(idx, entry)| batch_from_entry(entry, idx, fallback_id))
                .collect(),
            InputShape::Flat(items) => {
                let dataset_id = fallback_id.unwrap_or("dataset-0").to_string();
                let items = collect_records(items, &dataset_id);
                vec![Batch::new(dataset_id, 0, items)]
            }
        }
    }
}

/// Detect the input shape and normalize it into batches in one step.
pub fn normalize_to_batches(
    input: Value,
    fallback_id: Option<&str>,
) -> Result<Vec<Batch>, InputError> {
    let shape = InputShape::detect(input)?;
    let batches = shape.into_batches(fallback_id);
    debug!(batches = batches.len(), "Normalized input into batches");
    Ok(batches)
}

fn batch_from_entry(entry: Value, idx: usize, fallback_id: Option<&str>) -> Batch {
    let generated_id = || format!("{}-{}", fallback_id.unwrap_or("dataset"), idx);

    let Value::Object(mut fields) = entry else {
        warn!(index = idx, "Batch entry is not an object, treating it as empty");
        return Batch::new(generated_id(), 0, Vec::new());
    };

    let dataset_id = match fields.get("datasetId") {
        Some(Value::String(id)) if !id.is_empty() => id.clone(),
        _ => generated_id(),
    };

    let dataset_offset = fields
        .get("datasetOffset")
        .and_then(offset_from_value)
        .unwrap_or(0);

    let items = match fields.remove("items") {
        Some(Value::Array(items)) => collect_records(items, &dataset_id),
        _ => Vec::new(),
    };

    Batch::new(dataset_id, dataset_offset, items)
}

fn offset_from_value(value: &Value) -> Option<i64> {
    let Value::Number(n) = value else {
        return None;
    };
    // Fractional offsets are truncated toward zero.
    n.as_i64().or_else(|| n.as_f64().map(|f| f as i64))
}

fn collect_records(values: Vec<Value>, dataset_id: &str) -> Vec<Record> {
    let total = values.len();
    let records: Vec<Record> = values
        .into_iter()
        .filter_map(|value| match value {
            Value::Object(record) => Some(record),
            _ => None,
        })
        .collect();

    let skipped = total - records.len();
    if skipped > 0 {
        warn!(
            dataset_id = %dataset_id,
            skipped,
            "Skipped items that are not JSON objects"
        );
    }

    records
}

pub(crate) fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
