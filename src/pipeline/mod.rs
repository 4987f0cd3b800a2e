pub mod payload;
pub mod runner;

pub use payload::{DatasetPayload, MERGED_DATASET_ID};
pub use runner::{InputDocument, Pipeline, PipelineError, PipelineOutput, PipelineSettings};
