use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    #[serde(default)]
    pub dedup_fields: Vec<String>,
    #[serde(default = "default_pre_transform")]
    pub pre_transform: String,
    #[serde(default = "default_post_transform")]
    pub post_transform: String,
    #[serde(default = "default_output_mode")]
    pub output_mode: String,
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Value used by the `defaultCategory` transform.
    #[serde(default = "default_category")]
    pub default_category: String,
    #[serde(default)]
    pub input_files: Vec<PathBuf>,
    #[serde(default)]
    pub output: Option<PathBuf>,
    #[serde(default)]
    pub merged_output: Option<PathBuf>,
    #[serde(default)]
    pub duplicates_output: Option<PathBuf>,
    #[serde(default)]
    pub kv_store: Option<KvStoreConfig>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            dedup_fields: Vec::new(),
            pre_transform: default_pre_transform(),
            post_transform: default_post_transform(),
            output_mode: default_output_mode(),
            log_level: default_log_level(),
            default_category: default_category(),
            input_files: Vec::new(),
            output: None,
            merged_output: None,
            duplicates_output: None,
            kv_store: None,
        }
    }
}

impl Config {
    /// Key field for the key-value export: explicit, else the first dedup
    /// field, else `id`.
    pub fn kv_key_field(&self) -> String {
        self.kv_store
            .as_ref()
            .and_then(|kv| kv.key_field.clone())
            .or_else(|| self.dedup_fields.first().cloned())
            .unwrap_or_else(|| "id".to_string())
    }

    /// Replace blank values with their defaults and tidy the dedup field list.
    pub(crate) fn fill_defaults(&mut self) {
        fill_if_blank(&mut self.pre_transform, default_pre_transform);
        fill_if_blank(&mut self.post_transform, default_post_transform);
        fill_if_blank(&mut self.output_mode, default_output_mode);
        fill_if_blank(&mut self.log_level, default_log_level);
        fill_if_blank(&mut self.default_category, default_category);
        self.dedup_fields = clean_field_list(self.dedup_fields.iter().map(String::as_str));
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KvStoreConfig {
    pub path: PathBuf,
    #[serde(default)]
    pub key_field: Option<String>,
}

/// Trim entries and drop blank ones, keeping order.
pub fn clean_field_list<'a>(fields: impl IntoIterator<Item = &'a str>) -> Vec<String> {
    fields
        .into_iter()
        .map(str::trim)
        .filter(|f| !f.is_empty())
        .map(str::to_string)
        .collect()
}

fn fill_if_blank(value: &mut String, default: fn() -> String) {
    if value.trim().is_empty() {
        *value = default();
    }
}

fn default_pre_transform() -> String {
    "normalizeStrings".to_string()
}

fn default_post_transform() -> String {
    "sortById".to_string()
}

fn default_output_mode() -> String {
    "dataset".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_category() -> String {
    "General".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_document_uses_defaults() {
        let config: Config = serde_yaml::from_str("{}").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.pre_transform, "normalizeStrings");
        assert_eq!(config.post_transform, "sortById");
        assert_eq!(config.output_mode, "dataset");
        assert_eq!(config.log_level, "info");
        assert!(config.dedup_fields.is_empty());
    }

    #[test]
    fn test_fill_defaults_replaces_blanks() {
        let mut config: Config = serde_yaml::from_str(
            r#"{"preTransform": "", "outputMode": "  ", "dedupFields": [" id ", "", "name"]}"#,
        )
        .unwrap();

        config.fill_defaults();

        assert_eq!(config.pre_transform, "normalizeStrings");
        assert_eq!(config.output_mode, "dataset");
        assert_eq!(config.dedup_fields, vec!["id", "name"]);
    }

    #[test]
    fn test_kv_key_field_precedence() {
        let mut config = Config::default();
        assert_eq!(config.kv_key_field(), "id");

        config.dedup_fields = vec!["sku".to_string(), "id".to_string()];
        assert_eq!(config.kv_key_field(), "sku");

        config.kv_store = Some(KvStoreConfig {
            path: PathBuf::from("kv.json"),
            key_field: Some("code".to_string()),
        });
        assert_eq!(config.kv_key_field(), "code");
    }
}
