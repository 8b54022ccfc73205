//! Command-line interface definitions.

use clap::{ColorChoice, Parser, Subcommand};
use std::path::PathBuf;

/// Combine linked and inline CSS/JS into one cached file
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None, arg_required_else_help = true)]
pub struct Cli {
    /// Control colored output (auto, always, never)
    #[arg(long, global = true, default_value = "auto")]
    pub color: ColorChoice,

    /// Config file path (default: compress.toml)
    #[arg(short = 'C', long, global = true, default_value = "compress.toml", value_hint = clap::ValueHint::FilePath)]
    pub config: PathBuf,

    /// Enable verbose output for debugging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// subcommands
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Compress a block of stylesheet references
    Css {
        #[command(flatten)]
        args: RenderArgs,
    },

    /// Compress a block of script references
    Js {
        #[command(flatten)]
        args: RenderArgs,
    },

    /// Validate the config file
    #[command(visible_alias = "c")]
    Check,
}

/// Shared arguments for Css and Js
#[derive(clap::Args, Debug, Clone)]
pub struct RenderArgs {
    /// Markup file to compress. Reads stdin when omitted.
    #[arg(value_name = "INPUT", value_hint = clap::ValueHint::FilePath)]
    pub input: Option<PathBuf>,

    /// Emit xhtml-style self-closing references
    #[arg(long)]
    pub xhtml: bool,

    /// Output file name (without extension) instead of the content hash
    #[arg(long = "as", value_name = "NAME")]
    pub output_name: Option<String>,

    /// Re-emit the original references instead of compressing
    #[arg(long)]
    pub disable: bool,

    /// Skip the on-disk lookup cache
    #[arg(long)]
    pub no_cache: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_render() {
        let cli = Cli::parse_from(["compressor", "-v", "css", "page.html", "--xhtml", "--as", "site"]);
        assert!(cli.verbose);
        assert_eq!(cli.config, PathBuf::from("compress.toml"));
        let Commands::Css { args } = cli.command else {
            panic!("expected css");
        };
        assert_eq!(args.input, Some(PathBuf::from("page.html")));
        assert!(args.xhtml);
        assert_eq!(args.output_name.as_deref(), Some("site"));
        assert!(!args.disable);
    }

    #[test]
    fn test_parse_stdin_js() {
        let cli = Cli::parse_from(["compressor", "js", "--no-cache", "-C", "conf/compress.toml"]);
        assert_eq!(cli.config, PathBuf::from("conf/compress.toml"));
        let Commands::Js { args } = cli.command else {
            panic!("expected js");
        };
        assert!(args.input.is_none());
        assert!(args.no_cache);
    }
}
