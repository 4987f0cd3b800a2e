use clap::{Args, Parser, Subcommand};
use curate::cli::run::{resolve_config, RunArgs};
use curate::config::{resolve_config_path, CliOverrides};
use std::path::PathBuf;
use tracing::error;

#[derive(Parser)]
#[command(name = "curate")]
#[command(about = "Merge, deduplicate and transform JSON datasets", long_about = None)]
struct Cli {
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(flatten)]
    run: RunFlags,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the pipeline (default)
    Run(RunFlags),
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Write a commented starter config to ./curate.yml
    Init {
        #[arg(long)]
        stdout: bool,
    },
    /// Check a config file without running
    Validate,
}

#[derive(Args, Clone, Default)]
struct RunFlags {
    /// Input JSON file; repeat for several
    #[arg(long = "input", short = 'i')]
    inputs: Vec<PathBuf>,

    #[arg(long, short = 'o')]
    output: Option<PathBuf>,

    /// Comma-separated dedup field paths
    #[arg(long, alias = "dedupFields")]
    dedup_fields: Option<String>,

    #[arg(long, alias = "outputMode")]
    output_mode: Option<String>,

    #[arg(long)]
    log_level: Option<String>,

    #[arg(long)]
    merged_output: Option<PathBuf>,

    #[arg(long)]
    duplicates_output: Option<PathBuf>,

    #[arg(long)]
    kv_output: Option<PathBuf>,

    #[arg(long)]
    kv_key_field: Option<String>,
}

impl From<RunFlags> for CliOverrides {
    fn from(flags: RunFlags) -> Self {
        CliOverrides {
            inputs: flags.inputs,
            output: flags.output,
            dedup_fields: flags.dedup_fields,
            output_mode: flags.output_mode,
            log_level: flags.log_level,
            merged_output: flags.merged_output,
            duplicates_output: flags.duplicates_output,
            kv_output: flags.kv_output,
            kv_key_field: flags.kv_key_field,
        }
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Run(flags)) => run(cli.config, flags).await,
        None => run(cli.config, cli.run).await,
        Some(Commands::Config { action }) => {
            let result = match action {
                ConfigAction::Init { stdout } => curate::cli::config::init(stdout, None),
                ConfigAction::Validate => {
                    curate::cli::config::validate(resolve_config_path(cli.config.as_deref()))
                }
            };
            if let Err(e) = result {
                eprintln!("Error: {}", e);
                std::process::exit(1);
            }
        }
    }
}

async fn run(config: Option<PathBuf>, flags: RunFlags) {
    let args = RunArgs {
        config,
        overrides: flags.into(),
    };

    // Config comes first so its log level applies to the subscriber
    let loaded = match resolve_config(&args) {
        Ok(loaded) => loaded,
        Err(e) => {
            curate::logging::init_tracing("info");
            fatal(&e);
        }
    };
    curate::logging::init_tracing(&loaded.config.log_level);

    if let Err(e) = curate::cli::run::run(loaded).await {
        fatal(&e);
    }
}

fn fatal(e: &dyn std::fmt::Display) -> ! {
    error!(error = %e, "Run failed");
    std::process::exit(1);
}
