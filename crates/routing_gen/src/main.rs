//! CLI entry point for the routing dataset generator.

mod array;
mod config;
mod driver;
mod error;

use std::path::PathBuf;
use std::sync::atomic::AtomicBool;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

/// Generate synthetic rectilinear Steiner-tree routing samples.
#[derive(Parser, Debug)]
#[command(name = "routing_gen")]
#[command(about = "Generates paired source/target routing canvases for ML training")]
struct Args {
  /// Path to the INI configuration file.
  #[arg(long, default_value = "./config.ini")]
  config: PathBuf,
}

fn main() -> anyhow::Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
    .init();

  let args = Args::parse();

  let config = config::load(&args.config)
    .with_context(|| format!("loading configuration from {}", args.config.display()))?;

  tracing::info!(
    output = %config.output.display(),
    size = config.generation.size,
    depth = config.generation.depth,
    max_points = config.generation.max_points,
    desired_combinations = config.generation.desired_combinations,
    "starting generation"
  );

  let abort = AtomicBool::new(false);
  let summaries = driver::run(&config, &abort).context("generation failed")?;

  let total: u64 = summaries.iter().map(|s| s.samples_emitted).sum();
  tracing::info!(total_samples = total, "generation complete");

  Ok(())
}
