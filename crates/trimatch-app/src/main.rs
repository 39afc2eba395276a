#![deny(warnings)]

use std::io;

use anyhow::{Context, anyhow};
use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt};

use trimatch_app::Cli;

fn init_logging(default_filter: &str) -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_filter))
        .with_context(|| format!("parsing log filter '{default_filter}'"))?;
    fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(true)
        .try_init()
        .map_err(|err| anyhow!("installing log subscriber: {err}"))
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(&cli.log_level)?;

    let stdin = io::stdin();
    let stdout = io::stdout();
    trimatch_app::run(&cli, stdin.lock(), stdout.lock()).context("running trimatch")?;
    Ok(())
}
