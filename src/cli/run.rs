use crate::config::{
    apply_overrides, load_or_default, resolve_config_path, validate_config, CliOverrides, Config,
    ConfigError, LoadedConfig,
};
use crate::dedup::DedupStats;
use crate::output::{read_json, render_json, render_kv, write_all, FileError, RenderedFile};
use crate::pipeline::{InputDocument, Pipeline, PipelineError, PipelineOutput, PipelineSettings};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{info, warn};

/// Written when neither `--output` nor `output` is given.
pub const DEFAULT_OUTPUT: &str = "output.json";

#[derive(Debug, Error)]
pub enum RunError {
    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    #[error("{0}")]
    File(#[from] FileError),

    #[error("pipeline error: {0}")]
    Pipeline(#[from] PipelineError),

    #[error("no input files given; pass --input <file> or set inputFiles in the config")]
    NoInputs,
}

/// Arguments for a run, as collected from the command line.
#[derive(Debug, Clone, Default)]
pub struct RunArgs {
    pub config: Option<PathBuf>,
    pub overrides: CliOverrides,
}

/// What a finished run wrote.
#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    pub stats: DedupStats,
    pub written: Vec<PathBuf>,
}

/// Resolve the config file and layer the command-line overrides on top.
///
/// A file that cannot be read or parsed yields defaults; the reason is kept
/// in `fallback_reason` so it can be logged once tracing is up. The merged
/// config is validated again, so invalid overrides are as fatal as invalid
/// file values.
pub fn resolve_config(args: &RunArgs) -> Result<LoadedConfig, ConfigError> {
    let path = resolve_config_path(args.config.as_deref());
    let mut loaded = load_or_default(path.as_deref())?;
    apply_overrides(&mut loaded.config, &args.overrides);
    validate_config(&loaded.config)?;
    Ok(loaded)
}

/// Run the pipeline for a resolved config.
pub async fn run(loaded: LoadedConfig) -> Result<RunSummary, RunError> {
    if let Some(reason) = &loaded.fallback_reason {
        warn!(error = %reason, "Could not load config file, using defaults");
    }
    if let Some(source) = &loaded.source {
        info!(config_path = %source.display(), "Loaded configuration");
    }

    run_with_config(&loaded.config).await
}

pub async fn run_with_config(config: &Config) -> Result<RunSummary, RunError> {
    if config.input_files.is_empty() {
        return Err(RunError::NoInputs);
    }

    let output_path = config
        .output
        .clone()
        .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT));

    info!(
        inputs = config.input_files.len(),
        output = %output_path.display(),
        "Starting pipeline"
    );

    let mut documents = Vec::with_capacity(config.input_files.len());
    for path in &config.input_files {
        let value = read_json(path).await?;
        documents.push(InputDocument::new(fallback_id(path), value));
    }

    let pipeline = Pipeline::new(PipelineSettings::from(config));
    let output = pipeline.run(documents)?;
    let stats = output.payload.stats;

    let rendered = render_outputs(config, &output_path, output)?;

    write_all(&rendered).await?;
    let written: Vec<PathBuf> = rendered.into_iter().map(|file| file.path).collect();
    for path in &written {
        info!(path = %path.display(), "Wrote output");
    }

    info!(
        input_count = stats.input_count,
        output_count = stats.output_count,
        duplicate_count = stats.duplicate_count,
        files = written.len(),
        "Pipeline complete"
    );

    Ok(RunSummary { stats, written })
}

/// Serialize every output document before any of them is written.
fn render_outputs(
    config: &Config,
    output_path: &Path,
    output: PipelineOutput,
) -> Result<Vec<RenderedFile>, FileError> {
    let PipelineOutput {
        payload,
        merged,
        duplicates,
        ..
    } = output;

    let mut rendered = Vec::new();

    if let Some(kv) = &config.kv_store {
        rendered.push(render_kv(&kv.path, &payload.items, &config.kv_key_field())?);
    }
    if let Some(path) = &config.merged_output {
        rendered.push(render_json(path, &merged)?);
    }
    if let Some(path) = &config.duplicates_output {
        rendered.push(render_json(path, &duplicates)?);
    }

    rendered.insert(0, render_json(output_path, &payload.into_artifact())?);
    Ok(rendered)
}

/// Dataset id used for batches that carry none: the input's file name.
fn fallback_id(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
