//! Filter lookup by configured name.

use std::sync::Arc;

use rustc_hash::FxHashMap;

use super::{CssAbsolute, CssMedia, CssMin, Filter, FilterChain, JsMin};
use crate::error::{CompressError, Result};
use crate::fragment::{AssetKind, PathMapper};

/// Names of the filters every registry starts with.
pub const BUILTIN_FILTERS: &[&str] = &["css_absolute", "css_media", "css_min", "js_min"];

/// Filters always prepended to the configured css chain.
const CSS_DEFAULTS: &[&str] = &["css_absolute", "css_media"];

/// Named filters available to chains.
#[derive(Clone, Default)]
pub struct FilterRegistry {
    filters: FxHashMap<String, Arc<dyn Filter>>,
}

impl FilterRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with the built-in filters; `css_absolute` maps through `mapper`.
    pub fn with_builtins(mapper: &PathMapper) -> Self {
        let mut registry = Self::new();
        registry.register("css_absolute", CssAbsolute::new(mapper.clone()));
        registry.register("css_media", CssMedia);
        registry.register("css_min", CssMin);
        registry.register("js_min", JsMin);
        registry
    }

    /// Add or replace a filter.
    pub fn register(&mut self, name: impl Into<String>, filter: impl Filter + 'static) {
        self.filters.insert(name.into(), Arc::new(filter));
    }

    pub fn get(&self, name: &str) -> Option<&Arc<dyn Filter>> {
        self.filters.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.filters.contains_key(name)
    }

    /// Chain for `kind`: css defaults first, then `configured` in order.
    pub fn chain(&self, kind: AssetKind, configured: &[String]) -> Result<FilterChain> {
        let defaults = match kind {
            AssetKind::Css => CSS_DEFAULTS,
            AssetKind::Js => &[],
        };

        let names = defaults.iter().copied().chain(configured.iter().map(String::as_str));
        let filters = names
            .map(|name| {
                self.get(name)
                    .map(|filter| (name.to_owned(), Arc::clone(filter)))
                    .ok_or_else(|| {
                        CompressError::config(format!("{kind}_filters: unknown filter `{name}`"))
                    })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(FilterChain::new(filters))
    }
}
