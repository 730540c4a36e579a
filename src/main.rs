mod cli;
mod config;
mod converter;
mod encoding;
mod error;
mod fb2;
mod html;
mod image;
mod loader;
mod markdown;
mod metadata;
mod pane;
mod reader;
mod source;
mod txt;
mod xml;

use anyhow::Result;
use clap::Parser;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();

    converter::convert(&cli)
}
