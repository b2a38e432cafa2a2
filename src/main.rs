use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use helpmate_lib::bootstrap::{
    default_config_path, load_config, run_app, tracing::init_tracing_subscriber, AppConfig,
};
use tracing::info;

/// HelpMate registration and onboarding.
#[derive(Debug, Parser)]
#[command(name = "helpmate", version, about)]
struct Cli {
    /// Configuration file (defaults to the platform config dir).
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config_path = cli.config.or_else(default_config_path);
    let config = match &config_path {
        Some(path) => load_config(path)?,
        None => AppConfig::default(),
    };

    init_tracing_subscriber(&config.logging).context("Failed to initialize tracing")?;
    info!(config_path = ?config_path, "configuration loaded");

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("Failed to build tokio runtime")?;
    runtime.block_on(run_app(config))
}
