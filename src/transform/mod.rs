pub mod collection;
pub mod item;
pub mod registry;

pub use collection::sort_by_id;
pub use item::{normalize_strings, trim_name, with_default_category};
pub use registry::{
    apply_isolated, CollectionContext, CollectionTransform, ItemContext, ItemTransform,
    TransformError,
};
