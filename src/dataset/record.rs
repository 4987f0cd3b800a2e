use serde_json::{Map, Value};

/// A single dataset record: field name to arbitrary JSON value.
pub type Record = Map<String, Value>;

/// Provenance field carrying the originating batch id.
pub const DATASET_ID_FIELD: &str = "__datasetId";

/// Provenance field carrying the originating batch offset.
pub const DATASET_OFFSET_FIELD: &str = "__datasetOffset";

/// Placeholder id used by the merger when a batch has no usable id.
pub const DEFAULT_DATASET_ID: &str = "dataset";

/// A named, offset-tagged group of records sharing provenance.
///
/// `dataset_offset` is provenance metadata only (e.g. a row offset in a larger
/// source); batches are always processed in the order they are given.
#[derive(Debug, Clone, PartialEq)]
pub struct Batch {
    pub dataset_id: String,
    pub dataset_offset: i64,
    pub items: Vec<Record>,
}

impl Batch {
    pub fn new(dataset_id: impl Into<String>, dataset_offset: i64, items: Vec<Record>) -> Self {
        Self {
            dataset_id: dataset_id.into(),
            dataset_offset,
            items,
        }
    }

    /// The id used for provenance tagging; blank ids fall back to the placeholder.
    pub fn effective_id(&self) -> &str {
        if self.dataset_id.is_empty() {
            DEFAULT_DATASET_ID
        } else {
            &self.dataset_id
        }
    }
}

/// Render a JSON value the way it reads as a plain string key.
///
/// Strings are used verbatim, everything else uses its compact JSON text.
pub fn value_as_key_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
