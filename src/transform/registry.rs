use crate::dataset::Record;
use crate::dedup::DedupStats;
use crate::merge::MergeContext;
use crate::pipeline::MERGED_DATASET_ID;
use crate::transform::{collection, item};
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::str::FromStr;
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TransformError {
    #[error("unknown transform: {0}")]
    UnknownName(String),

    #[error("transform '{transform}' failed: {reason}")]
    Failed { transform: String, reason: String },
}

/// Provenance of the batch an item-level transform is applied within.
#[derive(Debug, Clone, Copy)]
pub struct ItemContext<'a> {
    pub dataset_id: &'a str,
    pub dataset_offset: i64,
}

/// What a collection-level transform sees about the run so far.
#[derive(Debug, Clone)]
pub struct CollectionContext {
    pub merge: MergeContext,
    pub stats: DedupStats,
    pub default_category: String,
}

/// Catalogue of item-level transforms.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemTransform {
    Identity,
    NormalizeStrings,
    TrimName,
}

impl ItemTransform {
    pub const fn name(&self) -> &'static str {
        match self {
            ItemTransform::Identity => "identity",
            ItemTransform::NormalizeStrings => "normalizeStrings",
            ItemTransform::TrimName => "trimName",
        }
    }

    /// Resolve a configured name, falling back to identity for unset, empty or
    /// unknown names.
    pub fn resolve(name: Option<&str>) -> Self {
        resolve_or_identity(name, ItemTransform::Identity)
    }

    pub fn apply(&self, record: &Record, _ctx: &ItemContext<'_>) -> Result<Record, TransformError> {
        Ok(match self {
            ItemTransform::Identity => record.clone(),
            ItemTransform::NormalizeStrings => item::normalize_strings(record),
            ItemTransform::TrimName => item::trim_name(record),
        })
    }

    /// Apply to every item of a batch with per-item fault isolation.
    pub fn apply_all(&self, items: Vec<Record>, ctx: &ItemContext<'_>) -> Vec<Record> {
        if *self == ItemTransform::Identity {
            return items;
        }
        apply_isolated(self.name(), ctx, items, |record| self.apply(record, ctx))
    }
}

impl FromStr for ItemTransform {
    type Err = TransformError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "identity" => Ok(ItemTransform::Identity),
            "normalizeStrings" => Ok(ItemTransform::NormalizeStrings),
            "trimName" => Ok(ItemTransform::TrimName),
            other => Err(TransformError::UnknownName(other.to_string())),
        }
    }
}

impl fmt::Display for ItemTransform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Catalogue of collection-level transforms.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollectionTransform {
    Identity,
    SortById,
    DefaultCategory,
}

impl CollectionTransform {
    pub const fn name(&self) -> &'static str {
        match self {
            CollectionTransform::Identity => "identity",
            CollectionTransform::SortById => "sortById",
            CollectionTransform::DefaultCategory => "defaultCategory",
        }
    }

    pub fn resolve(name: Option<&str>) -> Self {
        resolve_or_identity(name, CollectionTransform::Identity)
    }

    pub fn apply(&self, items: Vec<Record>, ctx: &CollectionContext) -> Vec<Record> {
        debug!(
            transform = self.name(),
            batch_count = ctx.merge.batch_count,
            total_input_items = ctx.merge.total_input_items,
            unique = ctx.stats.output_count,
            "Applying collection transform"
        );

        match self {
            CollectionTransform::Identity => items,
            CollectionTransform::SortById => collection::sort_by_id(items),
            CollectionTransform::DefaultCategory => {
                let item_ctx = ItemContext {
                    dataset_id: MERGED_DATASET_ID,
                    dataset_offset: 0,
                };
                apply_isolated(self.name(), &item_ctx, items, |record| {
                    Ok(item::with_default_category(record, &ctx.default_category))
                })
            }
        }
    }
}

impl FromStr for CollectionTransform {
    type Err = TransformError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "identity" => Ok(CollectionTransform::Identity),
            "sortById" => Ok(CollectionTransform::SortById),
            "defaultCategory" => Ok(CollectionTransform::DefaultCategory),
            other => Err(TransformError::UnknownName(other.to_string())),
        }
    }
}

impl fmt::Display for CollectionTransform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

fn resolve_or_identity<T>(name: Option<&str>, identity: T) -> T
where
    T: FromStr<Err = TransformError>,
{
    let Some(name) = name.map(str::trim).filter(|n| !n.is_empty()) else {
        return identity;
    };

    match name.parse() {
        Ok(transform) => transform,
        Err(e) => {
            warn!(error = %e, "Falling back to identity transform");
            identity
        }
    }
}

/// Map `f` over `items`, one item at a time.
///
/// An item whose transform returns an error or panics is kept in its original
/// form; the remaining items are still transformed. Output order matches input.
pub fn apply_isolated<F>(
    transform: &str,
    ctx: &ItemContext<'_>,
    items: Vec<Record>,
    f: F,
) -> Vec<Record>
where
    F: Fn(&Record) -> Result<Record, TransformError>,
{
    items
        .into_iter()
        .enumerate()
        .map(|(index, original)| {
            match panic::catch_unwind(AssertUnwindSafe(|| f(&original))) {
                Ok(Ok(transformed)) => transformed,
                Ok(Err(e)) => {
                    warn!(
                        transform,
                        dataset_id = %ctx.dataset_id,
                        dataset_offset = ctx.dataset_offset,
                        index,
                        error = %e,
                        "Transform failed, keeping original item"
                    );
                    original
                }
                Err(_) => {
                    warn!(
                        transform,
                        dataset_id = %ctx.dataset_id,
                        dataset_offset = ctx.dataset_offset,
                        index,
                        "Transform panicked, keeping original item"
                    );
                    original
                }
            }
        })
        .collect()
}
