use super::types::*;
use crate::config::{expand_env_vars, expand_tilde};
use regex::Regex;
use std::fs::File;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    #[error("validation failed:\n{}", .0.join("\n"))]
    ValidationList(Vec<String>),

    #[error("environment variables are not set: {}", .0.join(", "))]
    UnsetEnvVars(Vec<String>),
}

impl ConfigError {
    /// Read and parse failures, unset variables included, degrade to
    /// defaults; validation failures abort.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            ConfigError::Io(_) | ConfigError::YamlParse(_) | ConfigError::UnsetEnvVars(_)
        )
    }
}

/// Result of resolving the effective configuration.
#[derive(Debug)]
pub struct LoadedConfig {
    pub config: Config,
    /// The file the config came from, if one was used.
    pub source: Option<PathBuf>,
    /// A recoverable load failure that caused defaults to be used. Reported by
    /// the caller once logging is set up.
    pub fallback_reason: Option<ConfigError>,
}

/// Load, validate and post-process a config file (YAML or JSON).
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    use std::io::Read;

    let mut file = File::open(path).map_err(|e| {
        ConfigError::Io(std::io::Error::new(
            e.kind(),
            format!("failed to open config file '{}': {}", path.display(), e),
        ))
    })?;

    let mut text = String::new();
    file.read_to_string(&mut text).map_err(|e| {
        ConfigError::Io(std::io::Error::new(
            e.kind(),
            format!("failed to read config file '{}': {}", path.display(), e),
        ))
    })?;

    parse_config(&text)
}

/// Parse config text. JSON documents are accepted as YAML.
pub fn parse_config(text: &str) -> Result<Config, ConfigError> {
    // Expand environment variables in the text before parsing
    let text = expand_env_vars(text);
    check_unexpanded_vars(&text)?;

    let mut config: Config = if text.trim().is_empty() {
        Config::default()
    } else {
        serde_yaml::from_str(&text)?
    };

    config.fill_defaults();
    expand_paths(&mut config);
    validate_config(&config)?;

    Ok(config)
}

/// Load the config at `path`, falling back to defaults when it is missing or
/// cannot be read or parsed. Validation failures are returned as errors.
pub fn load_or_default(path: Option<&Path>) -> Result<LoadedConfig, ConfigError> {
    let Some(path) = path else {
        return Ok(LoadedConfig {
            config: Config::default(),
            source: None,
            fallback_reason: None,
        });
    };

    match load_config(path) {
        Ok(config) => Ok(LoadedConfig {
            config,
            source: Some(path.to_path_buf()),
            fallback_reason: None,
        }),
        Err(e) if e.is_recoverable() => Ok(LoadedConfig {
            config: Config::default(),
            source: None,
            fallback_reason: Some(e),
        }),
        Err(e) => Err(e),
    }
}

/// Fails when `$env{...}` references are left after expansion.
fn check_unexpanded_vars(text: &str) -> Result<(), ConfigError> {
    let re = Regex::new(r"\$env\{([A-Za-z_][A-Za-z0-9_]*)\}").unwrap();
    let mut unexpanded_vars: Vec<String> = re
        .captures_iter(text)
        .map(|cap| cap[1].to_string())
        .collect();

    if unexpanded_vars.is_empty() {
        return Ok(());
    }

    unexpanded_vars.sort();
    unexpanded_vars.dedup();

    Err(ConfigError::UnsetEnvVars(unexpanded_vars))
}

/// Expands tilde (~) in all path fields in the config.
fn expand_paths(config: &mut Config) {
    for input in config.input_files.iter_mut() {
        *input = expand_tilde(input);
    }

    for path in [
        &mut config.output,
        &mut config.merged_output,
        &mut config.duplicates_output,
    ]
    .into_iter()
    .flatten()
    {
        *path = expand_tilde(path);
    }

    if let Some(kv) = config.kv_store.as_mut() {
        kv.path = expand_tilde(&kv.path);
    }
}

/// Check a config, including one with command-line overrides applied.
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    let mut errors = Vec::new();

    for (i, field) in config.dedup_fields.iter().enumerate() {
        if field.split('.').any(str::is_empty) {
            errors.push(format!(
                "dedupFields[{}]: field path '{}' has an empty segment",
                i, field
            ));
        }
    }

    if let Some(kv) = &config.kv_store {
        if kv.path.as_os_str().is_empty() {
            errors.push("kvStore.path cannot be empty".to_string());
        }
        if let Some(key_field) = &kv.key_field {
            if key_field.trim().is_empty() {
                errors.push("kvStore.keyField cannot be blank".to_string());
            }
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ConfigError::ValidationList(errors))
    }
}
