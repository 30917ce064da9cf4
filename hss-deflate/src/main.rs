//! Main entry point for the hss-deflate CLI tool

use anyhow::Context;
use clap::Parser;
use hss_deflate::cli::{run_cli, Args};
use log::LevelFilter;
use simple_logger::SimpleLogger;

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // The logger accepts everything; the global max level does the filtering
    // so a config file can still raise it later.
    SimpleLogger::new()
        .with_level(LevelFilter::Trace)
        .init()
        .context("failed to initialize logger")?;
    log::set_max_level(args.log_level());

    run_cli(args)?;
    Ok(())
}
