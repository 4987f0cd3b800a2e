use crate::config::types::Config;
use crate::dataset::{normalize_to_batches, Batch, InputError, Record};
use crate::dedup::{deduplicate, parse_field_paths, FieldPath};
use crate::merge::{merge_batches, MergeContext};
use crate::pipeline::payload::{DatasetPayload, MERGED_DATASET_ID};
use crate::transform::{CollectionContext, CollectionTransform, ItemContext, ItemTransform};
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, info};

/// Errors that abort a pipeline run
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("invalid input '{source_id}': {error}")]
    Input {
        source_id: String,
        #[source]
        error: InputError,
    },
}

/// The subset of configuration the pipeline core consumes.
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineSettings {
    pub dedup_fields: Vec<String>,
    pub pre_transform: String,
    pub post_transform: String,
    pub output_mode: String,
    pub default_category: String,
    /// Keep a copy of the merged (pre-dedup) records in the output.
    pub retain_merged: bool,
}

impl From<&Config> for PipelineSettings {
    fn from(config: &Config) -> Self {
        Self {
            dedup_fields: config.dedup_fields.clone(),
            pre_transform: config.pre_transform.clone(),
            post_transform: config.post_transform.clone(),
            output_mode: config.output_mode.clone(),
            default_category: config.default_category.clone(),
            retain_merged: config.merged_output.is_some(),
        }
    }
}

/// A parsed input document and the id its batches fall back to.
#[derive(Debug, Clone)]
pub struct InputDocument {
    pub fallback_id: Option<String>,
    pub value: Value,
}

impl InputDocument {
    pub fn new(fallback_id: impl Into<String>, value: Value) -> Self {
        Self {
            fallback_id: Some(fallback_id.into()),
            value,
        }
    }
}

/// Everything a run produces.
#[derive(Debug, Clone)]
pub struct PipelineOutput {
    pub payload: DatasetPayload,
    pub merge_context: MergeContext,
    /// Merged records before dedup; empty unless `retain_merged` was set.
    pub merged: Vec<Record>,
    pub duplicates: Vec<Record>,
}

/// Normalize → pre-transform → merge → dedup → post-transform → assemble.
pub struct Pipeline {
    settings: PipelineSettings,
    fields: Vec<FieldPath>,
    pre: ItemTransform,
    post: CollectionTransform,
}

impl Pipeline {
    pub fn new(settings: PipelineSettings) -> Self {
        let fields = parse_field_paths(&settings.dedup_fields);
        let pre = ItemTransform::resolve(Some(&settings.pre_transform));
        let post = CollectionTransform::resolve(Some(&settings.post_transform));

        Self {
            settings,
            fields,
            pre,
            post,
        }
    }

    /// Run over parsed input documents, in the order given.
    ///
    /// Fails only when a document's top-level shape is not an array.
    pub fn run(&self, inputs: Vec<InputDocument>) -> Result<PipelineOutput, PipelineError> {
        let mut batches = Vec::new();
        for (idx, input) in inputs.into_iter().enumerate() {
            let source_id = input
                .fallback_id
                .clone()
                .unwrap_or_else(|| format!("input-{}", idx));
            let normalized = normalize_to_batches(input.value, input.fallback_id.as_deref())
                .map_err(|error| PipelineError::Input {
                    source_id: source_id.clone(),
                    error,
                })?;
            debug!(source = %source_id, batches = normalized.len(), "Loaded input");
            batches.extend(normalized);
        }

        Ok(self.run_batches(batches))
    }

    /// Run over already-normalized batches.
    pub fn run_batches(&self, batches: Vec<Batch>) -> PipelineOutput {
        let batches = self.pre_transform(batches);

        let merged = merge_batches(batches);
        info!(
            batch_count = merged.context.batch_count,
            total_input_items = merged.context.total_input_items,
            "Merged batches"
        );

        let retained = if self.settings.retain_merged {
            merged.merged_items.clone()
        } else {
            Vec::new()
        };

        let dedup = deduplicate(merged.merged_items, &self.fields);
        info!(
            input_count = dedup.stats.input_count,
            output_count = dedup.stats.output_count,
            duplicate_count = dedup.stats.duplicate_count,
            "Deduplication complete"
        );

        let ctx = CollectionContext {
            merge: merged.context,
            stats: dedup.stats,
            default_category: self.settings.default_category.clone(),
        };
        let items = self.post.apply(dedup.unique, &ctx);

        let payload = DatasetPayload {
            dataset_id: MERGED_DATASET_ID.to_string(),
            dataset_offset: 0,
            items,
            dedup_fields: self.settings.dedup_fields.clone(),
            output_mode: self.settings.output_mode.clone(),
            transformation_functions: [
                self.settings.pre_transform.clone(),
                self.settings.post_transform.clone(),
            ],
            stats: dedup.stats,
        };

        PipelineOutput {
            payload,
            merge_context: merged.context,
            merged: retained,
            duplicates: dedup.duplicates,
        }
    }

    fn pre_transform(&self, batches: Vec<Batch>) -> Vec<Batch> {
        batches
            .into_iter()
            .map(|batch| {
                let Batch {
                    dataset_id,
                    dataset_offset,
                    items,
                } = batch;
                let ctx = ItemContext {
                    dataset_id: &dataset_id,
                    dataset_offset,
                };
                let items = self.pre.apply_all(items, &ctx);
                Batch::new(dataset_id, dataset_offset, items)
            })
            .collect()
    }
}
