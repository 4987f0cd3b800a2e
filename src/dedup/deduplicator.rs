use crate::dataset::Record;
use crate::dedup::key::{build_key, FieldPath};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Record counts of a dedup pass. `input_count == output_count + duplicate_count`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DedupStats {
    pub input_count: usize,
    pub output_count: usize,
    pub duplicate_count: usize,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DedupResult {
    /// First occurrence of every key, in input order.
    pub unique: Vec<Record>,
    /// Every later occurrence, in input order.
    pub duplicates: Vec<Record>,
    pub stats: DedupStats,
}

/// Partition records into first occurrences and repeats.
///
/// The first record carrying a given key wins; nothing is reordered. An empty
/// `fields` list keys on the whole record.
pub fn deduplicate(records: Vec<Record>, fields: &[FieldPath]) -> DedupResult {
    let input_count = records.len();
    let mut seen: HashSet<String> = HashSet::with_capacity(input_count);
    let mut unique = Vec::new();
    let mut duplicates = Vec::new();

    for record in records {
        let key = build_key(&record, fields);
        if seen.insert(key) {
            unique.push(record);
        } else {
            duplicates.push(record);
        }
    }

    let stats = DedupStats {
        input_count,
        output_count: unique.len(),
        duplicate_count: duplicates.len(),
    };

    DedupResult {
        unique,
        duplicates,
        stats,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dedup::key::parse_field_paths;
    use serde_json::{json, Value};

    fn records(value: Value) -> Vec<Record> {
        match value {
            Value::Array(items) => items
                .into_iter()
                .map(|item| match item {
                    Value::Object(map) => map,
                    _ => panic!("test fixture items must be objects"),
                })
                .collect(),
            _ => panic!("test fixture must be an array"),
        }
    }

    #[test]
    fn test_dedup_on_id_and_name() {
        let items = records(json!([
            {"id": "1", "name": "alpha"},
            {"id": "2", "name": "beta"},
            {"id": "1", "name": "alpha"},
            {"id": "3", "name": "gamma"},
            {"id": "2", "name": "beta"}
        ]));

        let result = deduplicate(items, &parse_field_paths(&["id", "name"]));

        assert_eq!(result.unique.len(), 3);
        assert_eq!(result.duplicates.len(), 2);
        assert_eq!(
            result.stats,
            DedupStats {
                input_count: 5,
                output_count: 3,
                duplicate_count: 2
            }
        );
    }

    #[test]
    fn test_first_occurrence_wins() {
        let items = records(json!([
            {"id": "1", "version": 1},
            {"id": "2", "version": 1},
            {"id": "1", "version": 2}
        ]));

        let result = deduplicate(items, &parse_field_paths(&["id"]));

        let ids: Vec<_> = result.unique.iter().map(|r| r["id"].clone()).collect();
        assert_eq!(ids, vec![json!("1"), json!("2")]);
        assert_eq!(result.unique[0]["version"], json!(1));
        assert_eq!(result.duplicates[0]["version"], json!(2));
    }

    #[test]
    fn test_whole_record_key_with_reordered_fields() {
        let items = records(json!([
            {"id": "1", "name": "alpha"},
            {"name": "alpha", "id": "1"}
        ]));

        let result = deduplicate(items, &[]);

        assert_eq!(result.unique.len(), 1);
        assert_eq!(result.duplicates.len(), 1);
    }

    #[test]
    fn test_missing_fields_share_a_key() {
        let items = records(json!([{"name": "a"}, {"name": "b"}, {"id": null}]));

        let result = deduplicate(items, &parse_field_paths(&["id"]));

        // Both records without `id` collapse; explicit null is its own key
        assert_eq!(result.unique.len(), 2);
        assert_eq!(result.duplicates.len(), 1);
        assert_eq!(result.duplicates[0]["name"], json!("b"));
    }

    #[test]
    fn test_empty_input() {
        let result = deduplicate(Vec::new(), &parse_field_paths(&["id"]));
        assert!(result.unique.is_empty());
        assert!(result.duplicates.is_empty());
        assert_eq!(result.stats, DedupStats::default());
    }

    #[test]
    fn test_stats_are_conserved() {
        let items = records(json!([
            {"id": 1}, {"id": 1}, {"id": 2}, {"id": 1}, {"id": 3}, {"id": 2}
        ]));

        let result = deduplicate(items, &parse_field_paths(&["id"]));

        assert_eq!(
            result.stats.input_count,
            result.stats.output_count + result.stats.duplicate_count
        );
        assert_eq!(result.unique.len(), result.stats.output_count);
        assert_eq!(result.duplicates.len(), result.stats.duplicate_count);
    }

    #[test]
    fn test_stats_serialize_camel_case() {
        let stats = DedupStats {
            input_count: 5,
            output_count: 3,
            duplicate_count: 2,
        };
        assert_eq!(
            serde_json::to_value(stats).unwrap(),
            json!({"inputCount": 5, "outputCount": 3, "duplicateCount": 2})
        );
    }
}
