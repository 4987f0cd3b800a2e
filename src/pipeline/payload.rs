use crate::dataset::Record;
use crate::dedup::DedupStats;
use serde::{Deserialize, Serialize};

pub const MERGED_DATASET_ID: &str = "merged";

/// The final artifact of a run: records plus the settings that produced them.
///
/// Built once at the end of a run and serialized as the single element of a
/// JSON array.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DatasetPayload {
    pub dataset_id: String,
    pub dataset_offset: i64,
    pub items: Vec<Record>,
    pub dedup_fields: Vec<String>,
    pub output_mode: String,
    /// Configured `[pre, post]` transform names, as given.
    pub transformation_functions: [String; 2],
    pub stats: DedupStats,
}

impl DatasetPayload {
    /// Wrap the payload in the one-element array written to disk.
    pub fn into_artifact(self) -> Vec<DatasetPayload> {
        vec![self]
    }
}
