//! Binary crate for the `airquality` command-line tool.
//!
//! This crate focuses on:
//! - Parsing CLI arguments
//! - Serving the `/air_quality` HTTP endpoint
//! - Interactive configuration

use clap::Parser;
use tracing::Level;

mod cli;
mod http;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cmd = cli::Cli::parse();

    let level = match cmd.verbose {
        0 => Level::INFO,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt().with_max_level(level).with_writer(std::io::stderr).init();

    cmd.run().await
}
