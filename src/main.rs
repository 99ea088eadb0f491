#![forbid(unsafe_code)]
#![warn(clippy::pedantic)]

use std::{io, path::PathBuf};

use chessboard_rules::{config::GameConfig, repl::repl};
use clap::Parser;
use color_eyre::Result;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Play chess on the terminal by clicking squares as `row,col`.
#[derive(Debug, Parser)]
#[command(version)]
struct Args {
    /// TOML file with the starting board and display settings
    #[arg(short, long)]
    config: Option<PathBuf>,
}

fn main() -> Result<()> {
    install_tracing();
    color_eyre::install()?;

    let args = Args::parse();
    let config = match args.config {
        Some(path) => GameConfig::load(path)?,
        None => GameConfig::default(),
    };
    repl(&config)?;
    Ok(())
}

fn install_tracing() {
    let filter_layer = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let fmt_layer = fmt::layer()
        .with_target(false)
        .with_writer(io::stderr)
        .with_filter(filter_layer);

    tracing_subscriber::registry().with(fmt_layer).init();
}
