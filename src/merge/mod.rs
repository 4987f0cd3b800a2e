//! Order-preserving merge of dataset batches.

use crate::dataset::{Batch, Record, DATASET_ID_FIELD, DATASET_OFFSET_FIELD};
use serde::Serialize;
use serde_json::Value;

/// Diagnostic counts gathered while merging.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MergeContext {
    pub batch_count: usize,
    /// Raw items across all batches, counted before provenance tagging.
    pub total_input_items: usize,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct MergeResult {
    pub merged_items: Vec<Record>,
    pub context: MergeContext,
}

/// Concatenate batches into one provenance-tagged sequence.
///
/// Output order is batch order, then item order within each batch. Every
/// record gets `__datasetId` and `__datasetOffset` from its batch, overwriting
/// any fields of the same name the record already carried.
pub fn merge_batches(batches: Vec<Batch>) -> MergeResult {
    let mut context = MergeContext {
        batch_count: batches.len(),
        total_input_items: 0,
    };
    let mut merged_items = Vec::with_capacity(batches.iter().map(|b| b.items.len()).sum());

    for batch in batches {
        let dataset_id = Value::String(batch.effective_id().to_string());
        let dataset_offset = Value::from(batch.dataset_offset);
        context.total_input_items += batch.items.len();

        for mut item in batch.items {
            item.insert(DATASET_ID_FIELD.to_string(), dataset_id.clone());
            item.insert(DATASET_OFFSET_FIELD.to_string(), dataset_offset.clone());
            merged_items.push(item);
        }
    }

    MergeResult {
        merged_items,
        context,
    }
}
