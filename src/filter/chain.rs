//! Ordered filter application.

use std::sync::Arc;

use super::{Filter, HunkContext};
use crate::error::Result;

/// Filters of one kind, in application order.
#[derive(Clone, Default)]
pub struct FilterChain {
    filters: Vec<(String, Arc<dyn Filter>)>,
}

impl FilterChain {
    pub fn new(filters: Vec<(String, Arc<dyn Filter>)>) -> Self {
        Self { filters }
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.filters.iter().map(|(name, _)| name.as_str())
    }

    pub fn len(&self) -> usize {
        self.filters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }

    /// Run every input phase over one fragment's text.
    pub fn apply_input(&self, content: &str, ctx: &HunkContext) -> Result<String> {
        let mut text = content.to_owned();
        for (_, filter) in &self.filters {
            if let Some(out) = filter.input(&text, ctx)? {
                text = out;
            }
        }
        Ok(text)
    }

    /// Run every output phase over the joined text.
    pub fn apply_output(&self, content: &str) -> Result<String> {
        let mut text = content.to_owned();
        for (_, filter) in &self.filters {
            if let Some(out) = filter.output(&text)? {
                text = out;
            }
        }
        Ok(text)
    }
}

impl std::fmt::Debug for FilterChain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.names()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CompressError;
    use crate::fragment::AssetKind;
    use crate::markup::MarkupNode;

    /// Appends its tag in both phases.
    struct Tag(&'static str);

    impl Filter for Tag {
        fn input(&self, content: &str, _: &HunkContext) -> anyhow::Result<Option<String>> {
            Ok(Some(format!("{content}{}", self.0)))
        }

        fn output(&self, content: &str) -> anyhow::Result<Option<String>> {
            Ok(Some(format!("{content}{}", self.0.to_uppercase())))
        }
    }

    /// Implements neither phase.
    struct Nothing;
    impl Filter for Nothing {}

    struct Broken;
    impl Filter for Broken {
        fn output(&self, _: &str) -> anyhow::Result<Option<String>> {
            anyhow::bail!("broken filter")
        }
    }

    fn chain(filters: Vec<(&str, Arc<dyn Filter>)>) -> FilterChain {
        FilterChain::new(
            filters
                .into_iter()
                .map(|(name, f)| (name.to_owned(), f))
                .collect(),
        )
    }

    #[test]
    fn test_phases_run_in_order() {
        let node = MarkupNode::new("style", &[], "x");
        let ctx = HunkContext {
            kind: AssetKind::Css,
            path: None,
            node: &node,
        };
        let chain = chain(vec![("a", Arc::new(Tag("a"))), ("b", Arc::new(Tag("b")))]);

        assert_eq!(chain.apply_input("x", &ctx).unwrap(), "xab");
        assert_eq!(chain.apply_output("x").unwrap(), "xAB");
        assert_eq!(chain.names().collect::<Vec<_>>(), ["a", "b"]);
    }

    #[test]
    fn test_missing_phase_is_noop() {
        let node = MarkupNode::new("script", &[], "");
        let ctx = HunkContext {
            kind: AssetKind::Js,
            path: None,
            node: &node,
        };
        let chain = chain(vec![("nothing", Arc::new(Nothing))]);
        assert_eq!(chain.apply_input("var a;", &ctx).unwrap(), "var a;");
        assert_eq!(chain.apply_output("var a;").unwrap(), "var a;");
    }

    #[test]
    fn test_failure_propagates_unchanged() {
        let chain = chain(vec![("broken", Arc::new(Broken))]);
        let err = chain.apply_output("x").unwrap_err();
        assert!(matches!(err, CompressError::Filter(_)));
        assert_eq!(err.to_string(), "broken filter");
    }
}
