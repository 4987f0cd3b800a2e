pub mod normalize;
pub mod record;

pub use normalize::{normalize_to_batches, InputError, InputShape};
pub use record::{
    value_as_key_string, Batch, Record, DATASET_ID_FIELD, DATASET_OFFSET_FIELD,
    DEFAULT_DATASET_ID,
};
