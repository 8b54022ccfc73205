//! compressor - combine linked and inline CSS/JS into one cached file.

mod cli;

use anyhow::Result;
use clap::{ColorChoice, Parser};
use cli::{Cli, Commands};
use compressor::config::CompressConfig;
use compressor::{AssetKind, logger};

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set global color override based on CLI option
    match cli.color {
        ColorChoice::Always => owo_colors::set_override(true),
        ColorChoice::Never => owo_colors::set_override(false),
        ColorChoice::Auto => {} // owo-colors auto-detects TTY
    }
    logger::set_verbose(cli.verbose);

    let config = CompressConfig::load(&cli.config)?;

    match &cli.command {
        Commands::Css { args } => cli::render(config, AssetKind::Css, args),
        Commands::Js { args } => cli::render(config, AssetKind::Js, args),
        Commands::Check => cli::check(&config),
    }
}
