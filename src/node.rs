//! The `compress` block: argument parsing and cached rendering.
//!
//! ```text
//! compress css
//! compress js xhtml
//! compress css as site
//! compress css xhtml as site
//! ```

use std::str::FromStr;

use crate::compressor::{Compressor, Environment, check_output_name};
use crate::error::{CompressError, Result};
use crate::fragment::AssetKind;
use crate::{debug, log};

/// Parsed `compress` arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompressNode {
    pub kind: AssetKind,
    pub xhtml: bool,
    pub output_name: Option<String>,
}

impl CompressNode {
    pub fn new(kind: AssetKind) -> Self {
        Self {
            kind,
            xhtml: false,
            output_name: None,
        }
    }

    /// Parse `compress <css|js> [xhtml] [as <name>]`.
    pub fn parse(args: &str) -> Result<Self> {
        let tokens: Vec<&str> = args.split_whitespace().collect();
        let usage = || {
            CompressError::TagSyntax(format!(
                "expected `compress <css|js> [xhtml] [as <name>]`, got `{}`",
                args.trim()
            ))
        };

        if !(2..=5).contains(&tokens.len()) || tokens[0] != "compress" {
            return Err(usage());
        }
        let kind = AssetKind::from_str(tokens[1])?;

        let rest = &tokens[2..];
        let (xhtml, rest) = match rest.split_first() {
            Some((&"xhtml", rest)) => (true, rest),
            _ => (false, rest),
        };
        let output_name = match rest {
            [] => None,
            ["as", name] => {
                check_output_name(name)?;
                Some((*name).to_owned())
            }
            _ => return Err(usage()),
        };

        Ok(Self {
            kind,
            xhtml,
            output_name,
        })
    }

    /// Reference markup for `content`, served from the lookup cache when
    /// the cache key is known.
    pub fn render(&self, content: &str, env: &Environment) -> Result<String> {
        let compressor = Compressor::new(env, self.kind, content)?
            .xhtml(self.xhtml)
            .output_name(self.output_name.clone());

        if !env.config.enabled {
            return compressor.output();
        }

        let key = compressor.cache_key()?;
        if let Some(cached) = env.cache.get(&key) {
            debug!("cache"; "hit {}", key);
            return Ok(String::from_utf8_lossy(&cached).into_owned());
        }

        let output = compressor.output()?;
        env.cache.set(&key, output.as_bytes(), env.config.cache_ttl());
        log!("cache"; "stored {}", key);
        Ok(output)
    }
}

impl FromStr for CompressNode {
    type Err = CompressError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_forms() {
        assert_eq!(CompressNode::parse("compress css").unwrap(), CompressNode::new(AssetKind::Css));

        let node = CompressNode::parse("compress js xhtml").unwrap();
        assert!(node.xhtml);
        assert_eq!(node.kind, AssetKind::Js);

        let node = CompressNode::parse("compress css as site").unwrap();
        assert!(!node.xhtml);
        assert_eq!(node.output_name.as_deref(), Some("site"));

        let node: CompressNode = "compress css xhtml as site".parse().unwrap();
        assert!(node.xhtml);
        assert_eq!(node.output_name.as_deref(), Some("site"));
    }

    #[test]
    fn test_parse_errors() {
        for args in [
            "compress",
            "compress css xhtml as site extra",
            "compress html",
            "compress css as",
            "compress css xhtml xhtml",
            "minify css",
            "compress css as ../../x",
            "compress js xhtml as js/app",
        ] {
            assert!(
                matches!(CompressNode::parse(args), Err(CompressError::TagSyntax(_))),
                "{args}"
            );
        }
    }
}
