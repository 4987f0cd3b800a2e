pub mod generate;
pub mod parse;
pub mod types;

use regex::Regex;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

pub use parse::{
    load_config, load_or_default, parse_config, validate_config, ConfigError, LoadedConfig,
};
pub use types::{clean_field_list, Config, KvStoreConfig};

/// File names probed in the working directory when no `--config` is given.
pub const LOCAL_CONFIG_FILES: [&str; 2] = ["curate.yml", "curate.json"];

/// Environment variable naming the config file when `--config` is not given.
pub const CONFIG_PATH_ENV: &str = "DATASET_CONFIG_PATH";

/// Command-line values that take precedence over the config file.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CliOverrides {
    pub inputs: Vec<PathBuf>,
    pub output: Option<PathBuf>,
    /// Comma-separated list, as typed.
    pub dedup_fields: Option<String>,
    pub output_mode: Option<String>,
    pub log_level: Option<String>,
    pub merged_output: Option<PathBuf>,
    pub duplicates_output: Option<PathBuf>,
    pub kv_output: Option<PathBuf>,
    pub kv_key_field: Option<String>,
}

/// Layer CLI overrides on top of a loaded config.
///
/// `dedup_fields` is split on commas with blanks dropped; a blank
/// `output_mode` is ignored. A key-value override creates the `kvStore`
/// section when the file did not have one.
pub fn apply_overrides(config: &mut Config, overrides: &CliOverrides) {
    if let Some(fields) = &overrides.dedup_fields {
        config.dedup_fields = clean_field_list(fields.split(','));
    }

    if let Some(mode) = overrides.output_mode.as_deref().map(str::trim) {
        if !mode.is_empty() {
            config.output_mode = mode.to_string();
        }
    }

    if let Some(level) = overrides.log_level.as_deref().map(str::trim) {
        if !level.is_empty() {
            config.log_level = level.to_string();
        }
    }

    if !overrides.inputs.is_empty() {
        config.input_files = overrides.inputs.clone();
    }

    if let Some(path) = &overrides.output {
        config.output = Some(path.clone());
    }
    if let Some(path) = &overrides.merged_output {
        config.merged_output = Some(path.clone());
    }
    if let Some(path) = &overrides.duplicates_output {
        config.duplicates_output = Some(path.clone());
    }

    if let Some(path) = &overrides.kv_output {
        let key_field = config.kv_store.as_ref().and_then(|kv| kv.key_field.clone());
        config.kv_store = Some(KvStoreConfig {
            path: path.clone(),
            key_field,
        });
    }
    if let Some(key_field) = overrides.kv_key_field.as_deref().map(str::trim) {
        if let Some(kv) = config.kv_store.as_mut() {
            if !key_field.is_empty() {
                kv.key_field = Some(key_field.to_string());
            }
        }
    }
}

/// Expands environment variables in a string.
/// Supports $env{VAR_NAME} syntax; unset variables are left as written.
pub fn expand_env_vars(text: &str) -> String {
    let re = Regex::new(r"\$env\{([A-Za-z_][A-Za-z0-9_]*)\}").unwrap();

    re.replace_all(text, |caps: &regex::Captures| {
        std::env::var(&caps[1]).unwrap_or_else(|_| caps[0].to_string())
    })
    .to_string()
}

/// Expands a leading `~` or `~/` to the user's home directory.
pub fn expand_tilde(path: &Path) -> PathBuf {
    let path_str = path.to_string_lossy();

    if let Some(rest) = path_str.strip_prefix("~/") {
        if let Some(home_dir) = dirs::home_dir() {
            return home_dir.join(rest);
        }
    } else if path_str == "~" {
        if let Some(home_dir) = dirs::home_dir() {
            return home_dir;
        }
    }

    path.to_path_buf()
}

/// Resolves the config file path.
/// Returns the first match of:
/// 1. Explicit path (if provided, with tilde expansion)
/// 2. $DATASET_CONFIG_PATH, when set and not empty
/// 3. ./curate.yml or ./curate.json
/// 4. ~/.config/curate/config.yml
pub fn resolve_config_path(explicit: Option<&Path>) -> Option<PathBuf> {
    resolve_config_path_from(explicit, std::env::var_os(CONFIG_PATH_ENV))
}

fn resolve_config_path_from(explicit: Option<&Path>, from_env: Option<OsString>) -> Option<PathBuf> {
    if let Some(path) = explicit {
        return Some(expand_tilde(path));
    }

    if let Some(path) = from_env.filter(|p| !p.is_empty()) {
        return Some(expand_tilde(Path::new(&path)));
    }

    for name in LOCAL_CONFIG_FILES {
        let local = PathBuf::from(name);
        if local.exists() {
            return Some(local);
        }
    }

    if let Some(home_dir) = dirs::home_dir() {
        let user_config = home_dir.join(".config/curate/config.yml");
        if user_config.exists() {
            return Some(user_config);
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn test_dedup_fields_override() {
        let mut config = Config {
            dedup_fields: vec!["sku".to_string()],
            ..Config::default()
        };
        let overrides = CliOverrides {
            dedup_fields: Some(" id , ,name,".to_string()),
            ..CliOverrides::default()
        };

        apply_overrides(&mut config, &overrides);

        assert_eq!(config.dedup_fields, vec!["id", "name"]);
    }

    #[test]
    fn test_blank_output_mode_override_is_ignored() {
        let mut config = Config {
            output_mode: "kvstore".to_string(),
            ..Config::default()
        };

        apply_overrides(
            &mut config,
            &CliOverrides {
                output_mode: Some("   ".to_string()),
                ..CliOverrides::default()
            },
        );
        assert_eq!(config.output_mode, "kvstore");

        apply_overrides(
            &mut config,
            &CliOverrides {
                output_mode: Some(" dataset ".to_string()),
                ..CliOverrides::default()
            },
        );
        assert_eq!(config.output_mode, "dataset");
    }

    #[test]
    fn test_inputs_override_replaces_config_list() {
        let mut config = Config {
            input_files: vec![PathBuf::from("a.json"), PathBuf::from("b.json")],
            ..Config::default()
        };

        apply_overrides(
            &mut config,
            &CliOverrides {
                inputs: vec![PathBuf::from("c.json")],
                ..CliOverrides::default()
            },
        );

        assert_eq!(config.input_files, vec![PathBuf::from("c.json")]);
    }

    #[test]
    fn test_no_overrides_keeps_config() {
        let mut config = Config {
            dedup_fields: vec!["id".to_string()],
            output: Some(PathBuf::from("out.json")),
            ..Config::default()
        };
        let before = config.clone();

        apply_overrides(&mut config, &CliOverrides::default());

        assert_eq!(config, before);
    }

    #[test]
    fn test_kv_overrides() {
        let mut config = Config::default();

        // Key field alone does nothing without a kv target
        apply_overrides(
            &mut config,
            &CliOverrides {
                kv_key_field: Some("sku".to_string()),
                ..CliOverrides::default()
            },
        );
        assert!(config.kv_store.is_none());

        apply_overrides(
            &mut config,
            &CliOverrides {
                kv_output: Some(PathBuf::from("kv.json")),
                kv_key_field: Some("sku".to_string()),
                ..CliOverrides::default()
            },
        );
        assert_eq!(
            config.kv_store,
            Some(KvStoreConfig {
                path: PathBuf::from("kv.json"),
                key_field: Some("sku".to_string()),
            })
        );
    }

    #[test]
    fn test_expand_env_vars() {
        std::env::set_var("CURATE_TEST_DATA_DIR", "/srv/data");
        let result = expand_env_vars("input: $env{CURATE_TEST_DATA_DIR}/in.json");
        assert_eq!(result, "input: /srv/data/in.json");
        std::env::remove_var("CURATE_TEST_DATA_DIR");
    }

    #[test]
    fn test_expand_env_vars_unset_left_unchanged() {
        let result = expand_env_vars("$env{CURATE_TEST_NOT_SET}/file");
        assert_eq!(result, "$env{CURATE_TEST_NOT_SET}/file");
    }

    #[test]
    fn test_expand_tilde() {
        if let Some(home) = dirs::home_dir() {
            assert_eq!(expand_tilde(Path::new("~/data/in.json")), home.join("data/in.json"));
            assert_eq!(expand_tilde(Path::new("~")), home);
        }
        assert_eq!(expand_tilde(Path::new("/abs/in.json")), Path::new("/abs/in.json"));
        assert_eq!(expand_tilde(Path::new("rel/in.json")), Path::new("rel/in.json"));
    }

    #[test]
    fn test_explicit_config_path_wins() {
        let resolved = resolve_config_path_from(
            Some(Path::new("/tmp/custom.yml")),
            Some(OsString::from("/srv/env.json")),
        );
        assert_eq!(resolved, Some(PathBuf::from("/tmp/custom.yml")));
    }

    #[test]
    fn test_env_config_path_used_without_flag() {
        let resolved = resolve_config_path_from(None, Some(OsString::from("/srv/env.json")));
        assert_eq!(resolved, Some(PathBuf::from("/srv/env.json")));
    }

    #[test]
    fn test_empty_env_config_path_is_ignored() {
        let resolved = resolve_config_path_from(None, Some(OsString::new()));
        assert_ne!(resolved, Some(PathBuf::new()));
    }
}
