//! In-process transforms from compiled formats to native CSS.

use std::sync::Arc;

use anyhow::anyhow;
use lightningcss::stylesheet::{ParserOptions, PrinterOptions, StyleSheet};
use lightningcss::targets::{Browsers, Targets};
use rustc_hash::FxHashMap;

/// A source-to-source conversion run inside the process.
pub trait Transform: Send + Sync {
    fn convert(&self, source: &str) -> anyhow::Result<String>;
}

/// Nested CSS lowered to flat CSS.
///
/// Printing with targets that predate native nesting makes lightningcss
/// expand every nested rule into its own selector.
pub struct CssNesting;

impl Transform for CssNesting {
    fn convert(&self, source: &str) -> anyhow::Result<String> {
        let stylesheet =
            StyleSheet::parse(source, ParserOptions::default()).map_err(|e| anyhow!("{e}"))?;
        let targets = Targets::from(Browsers {
            chrome: Some(100 << 16),
            firefox: Some(100 << 16),
            safari: Some(15 << 16),
            ..Browsers::default()
        });
        let result = stylesheet
            .to_css(PrinterOptions {
                targets,
                ..PrinterOptions::default()
            })
            .map_err(|e| anyhow!("{e}"))?;
        Ok(result.code)
    }
}

/// Returns its input unchanged.
pub struct Identity;

impl Transform for Identity {
    fn convert(&self, source: &str) -> anyhow::Result<String> {
        Ok(source.to_owned())
    }
}

/// Named transforms available to `[compilers]` entries.
#[derive(Clone)]
pub struct TransformRegistry {
    transforms: FxHashMap<String, Arc<dyn Transform>>,
}

impl TransformRegistry {
    /// Empty registry.
    pub fn new() -> Self {
        Self {
            transforms: FxHashMap::default(),
        }
    }

    /// Registry with `css_nesting` and `identity`.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry.register("css_nesting", CssNesting);
        registry.register("identity", Identity);
        registry
    }

    pub fn register(&mut self, name: impl Into<String>, transform: impl Transform + 'static) {
        self.transforms.insert(name.into(), Arc::new(transform));
    }

    pub fn get(&self, name: &str) -> Option<&Arc<dyn Transform>> {
        self.transforms.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.transforms.contains_key(name)
    }
}

impl Default for TransformRegistry {
    fn default() -> Self {
        Self::with_builtins()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_css_nesting_flattens() {
        let css = CssNesting
            .convert(".card { color: red; & .title { color: blue; } }")
            .unwrap();
        assert!(css.contains(".card .title"));
        assert!(!css.contains('&'));
    }

    #[test]
    fn test_registry_builtins() {
        let registry = TransformRegistry::with_builtins();
        assert!(registry.contains("css_nesting"));
        assert!(registry.contains("identity"));
        assert!(!registry.contains("clevercss"));
        assert_eq!(registry.get("identity").unwrap().convert("a").unwrap(), "a");
    }
}
