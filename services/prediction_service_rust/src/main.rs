//! BetBuddy CLI
//!
//! Fixtures, standings and match predictions from API-Football.

mod cli;
mod commands;
mod config;
mod render;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use crate::cli::Cli;
use crate::config::Config;

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::from_filename(".env.local").ok();
    dotenv::dotenv().ok();

    let cli = Cli::parse();

    // Initialize logging
    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = Config::from_env().context("Failed to load configuration")?;
    debug!(
        "provider={:?} workers={} rate_limit={:?} cache_predictions={}",
        config.provider, config.max_workers, config.rate_limit, config.cache_predictions
    );

    commands::run(cli, config).await
}
