pub mod deduplicator;
pub mod key;

pub use deduplicator::{deduplicate, DedupResult, DedupStats};
pub use key::{build_key, canonical_json, parse_field_paths, FieldPath, ABSENT_MARKER};
