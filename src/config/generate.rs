pub fn generate_starter_config() -> String {
    r#"# =============================================================================
# CURATE CONFIGURATION
# =============================================================================
# Merge JSON datasets, drop duplicate records and write the result.
#
# Config file locations (in order of precedence):
#   1. Path specified via --config argument
#   2. $DATASET_CONFIG_PATH
#   3. ./curate.yml or ./curate.json
#   4. ~/.config/curate/config.yml
#
# Command-line flags (--input, --output, --dedup-fields, --output-mode, ...)
# override the values below. JSON config files use the same keys.

# =============================================================================
# INPUTS
# =============================================================================
# Each file holds either a flat array of records or an array of batches:
#   [{"datasetId": "shop-a", "datasetOffset": 0, "items": [...]}, ...]
# Files are merged in the order listed. $env{...} references and ~ are expanded.

inputFiles:
  - data/input.json

# =============================================================================
# DEDUPLICATION
# =============================================================================
# Dot-delimited field paths forming the duplicate key, in order. Leave empty
# to compare whole records (field order does not matter).

dedupFields:
  - id
  - name

# =============================================================================
# TRANSFORMS
# =============================================================================
# preTransform runs on every record before merging:
#   normalizeStrings  trim/collapse whitespace, lowercase *name* fields
#   trimName          trim the `name` field only
#   identity          leave records unchanged
# postTransform runs on the deduplicated collection:
#   sortById          stable sort by the string form of `id`
#   defaultCategory   set `category` to defaultCategory where missing
#   identity          leave the collection unchanged
# Unknown names fall back to identity.

preTransform: normalizeStrings
postTransform: sortById
defaultCategory: General

# =============================================================================
# OUTPUTS
# =============================================================================

output: data/output.json
outputMode: dataset

# Merged records before deduplication (optional)
# mergedOutput: data/merged.json

# Records dropped as duplicates (optional)
# duplicatesOutput: data/duplicates.json

# Key-value projection of the final records (optional). keyField defaults to
# the first dedup field, or `id`.
# kvStore:
#   path: data/kvstore.json
#   keyField: id

# =============================================================================
# LOGGING
# =============================================================================
# error, warn, info, debug or trace. RUST_LOG takes precedence when set.

logLevel: info
"#
    .to_string()
}
