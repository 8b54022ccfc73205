//! Everything a render needs besides its own markup.

use std::sync::Arc;

use crate::cache::{LookupCache, MemoryCache};
use crate::compiler::{Compilers, ExternalRunner, ShellRunner, TransformRegistry};
use crate::config::CompressConfig;
use crate::error::Result;
use crate::filter::{Filter, FilterRegistry};
use crate::fragment::PathMapper;

/// Shared, read-only collaborators of every [`Compressor`](super::Compressor).
pub struct Environment {
    pub config: CompressConfig,
    pub mapper: PathMapper,
    pub compilers: Compilers,
    pub filters: FilterRegistry,
    pub cache: Arc<dyn LookupCache>,
}

impl Environment {
    /// Built-in transforms and filters, the shell runner, an in-memory cache.
    pub fn from_config(config: CompressConfig) -> Result<Self> {
        let mapper = PathMapper::new(config.media_url.clone(), config.media_root.clone());
        let compilers = Compilers::new(
            config.compilers.clone(),
            TransformRegistry::with_builtins(),
            Arc::new(ShellRunner),
        )?;
        let filters = FilterRegistry::with_builtins(&mapper);
        Ok(Self {
            config,
            mapper,
            compilers,
            filters,
            cache: Arc::new(MemoryCache::new()),
        })
    }

    /// Replace the external compiler runner.
    pub fn with_runner(mut self, runner: Arc<dyn ExternalRunner>) -> Result<Self> {
        self.compilers = Compilers::new(
            self.config.compilers.clone(),
            TransformRegistry::with_builtins(),
            runner,
        )?;
        Ok(self)
    }

    /// Replace the lookup cache.
    pub fn with_cache(mut self, cache: Arc<dyn LookupCache>) -> Self {
        self.cache = cache;
        self
    }

    /// Make an extra filter available to `css_filters` / `js_filters`.
    pub fn with_filter(mut self, name: impl Into<String>, filter: impl Filter + 'static) -> Self {
        self.filters.register(name, filter);
        self
    }
}
