use anyhow::Context;
use clap::Parser;
use tracing::debug;

use slab_cli::{Cli, CliConfig, app, logging};

// ─── entry point ─────────────────────────────────────────────────────────────

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = CliConfig::load(cli.config.as_deref()).context("Failed to load configuration")?;

    let level = cli.log_level.as_deref().unwrap_or(&config.log_level);
    logging::init_logging(level)?;
    debug!(regime = config.regime.as_str(), "configuration loaded");

    let output = app::run(&cli.command, &config)?;
    println!("{}", output.trim_end());

    Ok(())
}
