//! Configuration management for `compress.toml`.
//!
//! # Module Structure
//!
//! ```text
//! config/
//! ├── compiler.rs    # [compilers.".ext"] entries
//! ├── error.rs       # ConfigError, ConfigDiagnostics, FieldPath
//! ├── util.rs        # config file discovery
//! └── mod.rs         # CompressConfig (this file)
//! ```
//!
//! # Keys
//!
//! | Key                | Purpose                                          |
//! |--------------------|--------------------------------------------------|
//! | `enabled`          | Compress, or re-emit the original nodes          |
//! | `debug`            | Strict mode: unresolvable assets are errors      |
//! | `media_url`        | Public URL prefix of managed assets              |
//! | `media_root`       | Filesystem directory behind `media_url`          |
//! | `output_dir`       | Output directory below the media root            |
//! | `cache_ttl`        | Lookup cache entry lifetime (seconds)            |
//! | `cache_dir`        | On-disk lookup cache directory (CLI)             |
//! | `css_filters`      | Filters appended after the css built-ins         |
//! | `js_filters`       | Filters for scripts                              |
//! | `[compilers]`      | Compiled stylesheet formats                      |
//! | `[templates]`      | Reference markup for the output file             |

mod compiler;
mod error;
mod util;

pub use compiler::CompilerFormat;
pub use error::{ConfigDiagnostic, ConfigDiagnostics, ConfigError, FieldPath};
pub use util::find_config_file;

use crate::compiler::TransformRegistry;
use crate::compressor::template::{DEFAULT_CSS_TEMPLATE, DEFAULT_JS_TEMPLATE};
use crate::filter::BUILTIN_FILTERS;
use crate::{debug, log};
use anyhow::Result;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::{
    fs, io,
    path::{Path, PathBuf},
    time::Duration,
};

/// Default config file name.
pub const CONFIG_FILE: &str = "compress.toml";

// ============================================================================
// root configuration
// ============================================================================

/// Root configuration structure representing compress.toml
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CompressConfig {
    /// Absolute path to the config file (internal use only)
    #[serde(skip)]
    pub config_path: PathBuf,

    /// Directory relative paths are resolved against (internal use only)
    #[serde(skip)]
    pub root: PathBuf,

    pub enabled: bool,
    pub debug: bool,
    pub media_url: String,
    pub media_root: PathBuf,
    pub output_dir: String,
    pub cache_ttl: u64,
    pub cache_dir: PathBuf,
    pub css_filters: Vec<String>,
    pub js_filters: Vec<String>,
    pub compilers: FxHashMap<String, CompilerFormat>,
    pub templates: TemplatesConfig,
}

impl Default for CompressConfig {
    fn default() -> Self {
        Self {
            config_path: PathBuf::new(),
            root: PathBuf::new(),
            enabled: true,
            debug: false,
            media_url: "/media/".into(),
            media_root: PathBuf::from("media"),
            output_dir: "CACHE".into(),
            cache_ttl: 86_400,
            cache_dir: PathBuf::from(".compressor/cache"),
            css_filters: Vec::new(),
            js_filters: Vec::new(),
            compilers: FxHashMap::default(),
            templates: TemplatesConfig::default(),
        }
    }
}

/// Reference markup templates. `{url}` is the output URL, `{close}` is
/// ` /` in xhtml mode and empty otherwise.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TemplatesConfig {
    pub css: String,
    pub js: String,
}

impl Default for TemplatesConfig {
    fn default() -> Self {
        Self {
            css: DEFAULT_CSS_TEMPLATE.into(),
            js: DEFAULT_JS_TEMPLATE.into(),
        }
    }
}

impl CompressConfig {
    /// Load configuration from `path`.
    ///
    /// A missing `compress.toml` yields the defaults rooted at the current
    /// directory. Any other missing path is an error.
    pub fn load(path: &Path) -> Result<Self> {
        let (mut config, root) = match find_config_file(path) {
            Some(found) => {
                let config = Self::from_path(&found)?;
                let root = found.parent().map(Path::to_path_buf).unwrap_or_default();
                (Self { config_path: found, ..config }, root)
            }
            None if path != Path::new(CONFIG_FILE) => {
                let err = io::Error::new(io::ErrorKind::NotFound, "config file not found");
                return Err(ConfigError::Io(path.to_path_buf(), err).into());
            }
            None => {
                debug!("config"; "{} not found, using defaults", path.display());
                (Self::default(), std::env::current_dir()?)
            }
        };
        config.finalize(&root);
        Ok(config)
    }

    /// Parse configuration from TOML string
    pub fn from_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)?;
        Ok(config)
    }

    /// Load configuration from file path with unknown field detection.
    fn from_path(path: &Path) -> Result<Self> {
        let content =
            fs::read_to_string(path).map_err(|err| ConfigError::Io(path.to_path_buf(), err))?;

        let (config, ignored) = Self::parse_with_ignored(&content)?;
        if !ignored.is_empty() {
            Self::print_unknown_fields_warning(&ignored, path);
        }
        Ok(config)
    }

    /// Parse TOML content, collecting any unknown fields.
    fn parse_with_ignored(content: &str) -> Result<(Self, Vec<String>), ConfigError> {
        let mut ignored = Vec::new();
        let deserializer = toml::Deserializer::new(content);
        let config = serde_ignored::deserialize(deserializer, |path: serde_ignored::Path| {
            ignored.push(path.to_string());
        })?;
        Ok((config, ignored))
    }

    fn print_unknown_fields_warning(fields: &[String], path: &Path) {
        let display_path = path
            .file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_else(|| path.to_string_lossy());
        log!("warning"; "unknown fields in {}, ignoring: {}", display_path, fields.join(", "));
    }

    /// Resolve `media_root` and `cache_dir` against `root`.
    pub fn finalize(&mut self, root: &Path) {
        self.root = root.to_path_buf();
        self.media_root = Self::resolve_dir(&self.media_root, root);
        self.cache_dir = Self::resolve_dir(&self.cache_dir, root);
    }

    /// Tilde-expand, then join relative paths onto `root`.
    fn resolve_dir(path: &Path, root: &Path) -> PathBuf {
        let expanded = shellexpand::tilde(&path.to_string_lossy()).into_owned();
        let path = PathBuf::from(expanded);
        if path.is_relative() {
            root.join(path)
        } else {
            path
        }
    }

    /// Lookup cache entry lifetime.
    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl)
    }

    // ========================================================================
    // validation
    // ========================================================================

    /// Validate configuration, collecting all errors at once.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut diag = ConfigDiagnostics::new();

        if !self.media_url.ends_with('/') {
            diag.error_with_hint(
                FieldPath::new("media_url"),
                format!("`{}` must end with `/`", self.media_url),
                format!("use \"{}/\"", self.media_url),
            );
        }

        if self.output_dir.trim_matches('/').is_empty() {
            diag.error(FieldPath::new("output_dir"), "must not be empty");
        }

        Self::validate_filters("css_filters", &self.css_filters, &mut diag);
        Self::validate_filters("js_filters", &self.js_filters, &mut diag);

        let transforms = TransformRegistry::with_builtins();
        let mut exts: Vec<_> = self.compilers.keys().collect();
        exts.sort();
        for ext in exts {
            self.compilers[ext].validate(ext, &transforms, &mut diag);
        }

        for (name, template) in [("css", &self.templates.css), ("js", &self.templates.js)] {
            if !template.contains("{url}") {
                diag.error(
                    FieldPath::new(format!("templates.{name}")),
                    "template must contain `{url}`",
                );
            }
        }

        diag.into_result().map_err(ConfigError::Diagnostics)
    }

    fn validate_filters(field: &str, names: &[String], diag: &mut ConfigDiagnostics) {
        for name in names {
            if !BUILTIN_FILTERS.contains(&name.as_str()) {
                diag.error_with_hint(
                    FieldPath::new(field),
                    format!("unknown filter `{name}`"),
                    format!("available: {}", BUILTIN_FILTERS.join(", ")),
                );
            }
        }
    }
}

// ============================================================================
// tests
// ============================================================================
