use anyhow::{Context, Result, bail};
use archivist_common::OutputFormat;
use archivist_common::observability::{LogConfig, init_logging};
use archivist_config::{ArchivistConfig, ArchivistConfigLoader, default_config_path};
use clap::Parser;
use std::path::PathBuf;
mod search;

/// Query a self-hosted Tube Archivist instance and print normalized results.
#[derive(Debug, Parser)]
#[command(name = "archivist-search", version)]
struct Args {
    /// Configuration file (defaults to the per-user config dir).
    #[arg(short, long, env = "ARCHIVIST_CONFIG")]
    config: Option<PathBuf>,

    /// Engine instance name; the first enabled one when omitted.
    #[arg(short, long)]
    engine: Option<String>,

    #[arg(short, long, default_value_t = OutputFormat::Json)]
    format: OutputFormat,

    /// Search terms, joined with spaces.
    query: Vec<String>,
}

fn load_config(args: &Args) -> Result<ArchivistConfig> {
    let loader = ArchivistConfigLoader::new();
    let loader = match (&args.config, default_config_path()) {
        (Some(path), _) => loader.with_file(path),
        (None, Some(path)) => loader.with_optional_file(path),
        (None, None) => loader,
    };
    loader.load().context("failed to load configuration")
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // 1) Load config (env wins)
    let cfg = load_config(&args)?;

    // 2) Logging, from the config file when it has a section
    let log_config = cfg
        .logging
        .as_ref()
        .map(|l| l.to_log_config())
        .unwrap_or_else(LogConfig::default);
    let log_path = init_logging(log_config)?;
    tracing::debug!(path = %log_path.display(), version = ?cfg.version, "archivist.start");

    let Some(spec) = cfg.select_engine(args.engine.as_deref()) else {
        match &args.engine {
            Some(name) => bail!("no enabled engine named {name:?} in configuration"),
            None => bail!("no enabled engine in configuration"),
        }
    };

    let instance = search::build_from_spec(spec)?;
    let query = args.query.join(" ");
    let results = instance.search(&query).await?;

    let rendered = search::render(&results, args.format)?;
    if !rendered.is_empty() {
        println!("{rendered}");
    }
    Ok(())
}
