//! Command implementations.

mod args;

pub use args::{Cli, Commands, RenderArgs};

use std::io::Read;
use std::sync::Arc;

use anyhow::{Context, Result};
use compressor::cache::{FileCache, NullCache};
use compressor::config::CompressConfig;
use compressor::{AssetKind, CompressNode, Environment, log};

/// Compress one markup block and print its reference markup.
pub fn render(config: CompressConfig, kind: AssetKind, args: &RenderArgs) -> Result<()> {
    config.validate()?;
    let content = read_input(args)?;

    let mut config = config;
    if args.disable {
        config.enabled = false;
    }

    let env = Environment::from_config(config)?;
    let env = if args.no_cache {
        env.with_cache(Arc::new(NullCache))
    } else {
        let cache = FileCache::new(env.config.cache_dir.clone());
        env.with_cache(Arc::new(cache))
    };

    let node = CompressNode {
        kind,
        xhtml: args.xhtml,
        output_name: args.output_name.clone(),
    };
    let output = node.render(&content, &env)?;
    println!("{output}");
    Ok(())
}

/// Validate the loaded config and report every problem at once.
pub fn check(config: &CompressConfig) -> Result<()> {
    config.validate()?;
    let name = if config.config_path.as_os_str().is_empty() {
        "defaults".to_owned()
    } else {
        config.config_path.display().to_string()
    };
    log!("check"; "{} is valid", name);
    Ok(())
}

fn read_input(args: &RenderArgs) -> Result<String> {
    match &args.input {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display())),
        None => {
            let mut content = String::new();
            std::io::stdin()
                .read_to_string(&mut content)
                .context("failed to read stdin")?;
            Ok(content)
        }
    }
}
