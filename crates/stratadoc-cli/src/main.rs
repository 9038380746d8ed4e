//! Stratadoc CLI - extract documentation metadata from compiled modules

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use stratadoc_core::{
    extract, log_and_continue, Config, ExtractOptions, ModuleRecord, StaticTypeChecker,
    SymbolTableHost, CONFIG_FILE,
};

#[derive(Parser)]
#[command(name = "stratadoc")]
#[command(version = stratadoc_core::VERSION)]
#[command(about = "Extract documentation metadata from module symbol tables", long_about = None)]
struct Cli {
    /// Source roots to scan: directories or .zip/.jar archives
    /// (defaults to the configured source paths)
    roots: Vec<PathBuf>,

    /// Path to the config file (defaults to ./stratadoc.toml when present)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Write the metadata to this file instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Pretty-print the JSON output
    #[arg(long)]
    pretty: bool,

    /// Only extract modules matching these glob patterns (comma-separated)
    #[arg(long, value_delimiter = ',')]
    include: Vec<String>,

    /// Skip modules matching these glob patterns (comma-separated)
    #[arg(long, value_delimiter = ',')]
    exclude: Vec<String>,

    /// Attach type signatures from the type annotations in symbol tables
    #[arg(long)]
    type_sigs: bool,

    /// Exit with an error if any module fails to load
    #[arg(long)]
    strict: bool,

    /// Show debug logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = load_config(&cli)?;
    let filter = config
        .module_filter()
        .context("invalid module pattern")?;

    let checker = StaticTypeChecker;
    let mut failed = Vec::new();
    let records = {
        let mut options = ExtractOptions::new()
            .with_filter(filter)
            .with_exception_handler(|error, module| {
                log_and_continue(error, module);
                failed.push(module.clone());
            });
        if cli.type_sigs {
            options = options.with_type_checker(&checker);
        }

        let mut host = SymbolTableHost::new();
        extract(&mut host, &config.extract.source_paths, options)
    };

    write_output(&records, config.output.path.as_deref(), config.output.pretty)?;

    if cli.strict && !failed.is_empty() {
        let names: Vec<_> = failed.iter().map(|m| m.as_str()).collect();
        anyhow::bail!(
            "{} module(s) failed to load: {}",
            failed.len(),
            names.join(", ")
        );
    }

    Ok(())
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Merge the config file with command-line overrides.
fn load_config(cli: &Cli) -> Result<Config> {
    let mut config = match &cli.config {
        Some(path) => Config::load(path)
            .with_context(|| format!("Failed to load config '{}'", path.display()))?,
        None if Path::new(CONFIG_FILE).is_file() => Config::load(CONFIG_FILE)
            .with_context(|| format!("Failed to load config '{}'", CONFIG_FILE))?,
        None => Config::default(),
    };

    if !cli.roots.is_empty() {
        config.extract.source_paths = cli.roots.clone();
    }
    config.extract.include.extend(cli.include.iter().cloned());
    config.extract.exclude.extend(cli.exclude.iter().cloned());
    if let Some(output) = &cli.output {
        config.output.path = Some(output.clone());
    }
    config.output.pretty |= cli.pretty;

    Ok(config)
}

fn write_output(records: &[ModuleRecord], path: Option<&Path>, pretty: bool) -> Result<()> {
    let json = if pretty {
        serde_json::to_string_pretty(records)?
    } else {
        serde_json::to_string(records)?
    };

    match path {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent).with_context(|| {
                    format!("Failed to create output directory '{}'", parent.display())
                })?;
            }
            fs::write(path, json + "\n")
                .with_context(|| format!("Failed to write '{}'", path.display()))?;
            tracing::info!(path = %path.display(), modules = records.len(), "wrote metadata");
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            writeln!(stdout, "{json}")?;
        }
    }
    Ok(())
}
