use anyhow::{Context as AnyhowContext, Result};
use clap::Parser;
use framefield_collector::{run_tree, FrameSpec};
use framefield_protocol::FIELDS_LOADED_EVENT;
use log::info;
use std::fs;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "framefield")]
#[command(about = "Aggregate field records across a frame tree", long_about = None)]
#[command(version)]
struct Cli {
    /// Path to a JSON frame-tree description
    tree: PathBuf,

    /// Pretty-print the output JSON
    #[arg(long)]
    pretty: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Quiet mode: log only warnings/errors (stdout is reserved for JSON)
    #[arg(long)]
    quiet: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    if cli.quiet {
        builder.filter_level(log::LevelFilter::Warn);
    } else if cli.verbose {
        builder.filter_level(log::LevelFilter::Debug);
    }
    builder.target(env_logger::Target::Stderr).init();

    let raw = fs::read_to_string(&cli.tree)
        .with_context(|| format!("failed to read {}", cli.tree.display()))?;
    let spec: FrameSpec = serde_json::from_str(&raw)
        .with_context(|| format!("invalid frame tree in {}", cli.tree.display()))?;

    let loaded = run_tree(spec).await?;
    info!("{FIELDS_LOADED_EVENT}: {} fields", loaded.fields.len());

    let out = if cli.pretty {
        serde_json::to_string_pretty(&loaded)?
    } else {
        serde_json::to_string(&loaded)?
    };
    println!("{out}");
    Ok(())
}
