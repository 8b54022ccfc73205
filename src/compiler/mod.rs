//! Compiler dispatch for compiled stylesheet formats.
//!
//! Each `[compilers.".ext"]` entry names an in-process transform, an
//! external binary, or both. The in-process transform always wins when
//! present; the binary is the fallback.
//!
//! Binary compilation writes a sibling file with the native extension next
//! to the source and is skipped while that sibling is up to date.

mod external;
mod transform;

pub use external::{ExternalOutput, ExternalRunner, ShellRunner};
pub use transform::{CssNesting, Identity, Transform, TransformRegistry};

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use rustc_hash::FxHashMap;

use crate::config::CompilerFormat;
use crate::error::{CompressError, Result};
use crate::freshness;
use crate::log;

/// Native stylesheet extension (without the dot).
const NATIVE_EXT: &str = "css";

/// Sibling of `source` carrying the native extension.
pub fn native_sibling(source: &Path) -> PathBuf {
    source.with_extension(NATIVE_EXT)
}

/// Compiled-format registry plus the means to run it.
#[derive(Clone)]
pub struct Compilers {
    formats: FxHashMap<String, CompilerFormat>,
    transforms: TransformRegistry,
    runner: Arc<dyn ExternalRunner>,
}

impl Compilers {
    /// Build the dispatch table; every named transform must be registered.
    pub fn new(
        formats: FxHashMap<String, CompilerFormat>,
        transforms: TransformRegistry,
        runner: Arc<dyn ExternalRunner>,
    ) -> Result<Self> {
        for (ext, format) in &formats {
            if let Some(name) = &format.transform
                && !transforms.contains(name)
            {
                return Err(CompressError::config(format!(
                    "compilers.\"{ext}\".transform: unknown transform `{name}`"
                )));
            }
        }
        Ok(Self {
            formats,
            transforms,
            runner,
        })
    }

    /// Whether `ext` (with leading dot) is a configured compiled format.
    pub fn is_compiled(&self, ext: &str) -> bool {
        self.formats.contains_key(ext)
    }

    fn transform_for(&self, ext: &str) -> Result<&Arc<dyn Transform>> {
        self.formats
            .get(ext)
            .and_then(|format| format.transform.as_deref())
            .and_then(|name| self.transforms.get(name))
            .ok_or_else(|| CompressError::TransformUnavailable {
                ext: ext.to_owned(),
            })
    }

    /// Run the in-process transform registered for `ext` on `source`.
    pub fn compile_in_process(&self, ext: &str, source: &str) -> Result<String> {
        self.transform_for(ext)?
            .convert(source)
            .map_err(|source| CompressError::Transform {
                ext: ext.to_owned(),
                source,
            })
    }

    /// Read `path` and run the in-process transform for `ext` on it.
    ///
    /// Fails with `TransformUnavailable` before touching the file when no
    /// transform is registered.
    pub fn compile_file_in_process(&self, ext: &str, path: &Path) -> Result<String> {
        self.transform_for(ext)?;
        let source = fs::read_to_string(path).map_err(|e| CompressError::io(path, e))?;
        self.compile_in_process(ext, &source)
    }

    /// Staleness gate: sibling missing or strictly older than `source`.
    pub fn needs_recompile(&self, source: &Path) -> bool {
        freshness::needs_recompile(source, &native_sibling(source))
    }

    /// Command line for compiling `source` with the binary for `ext`.
    ///
    /// Every `*` in the argument template becomes the source path without
    /// its extension.
    pub fn command_for(&self, ext: &str, source: &Path) -> Result<String> {
        let format = self.formats.get(ext).ok_or_else(|| {
            CompressError::config(format!("`{ext}` is not a configured compiled format"))
        })?;
        let Some(binary) = format.binary_path.as_deref().filter(|b| !b.is_empty()) else {
            return Err(CompressError::config(format!(
                "path to CSS compiler must be set in compilers.\"{ext}\".binary_path"
            )));
        };

        let base = source.with_extension("");
        let arguments = format.arguments.replace('*', &base.to_string_lossy());
        Ok(format!("{binary} {arguments}").trim_end().to_owned())
    }

    /// Run the external compiler for `source`; it writes the native sibling.
    pub fn compile_binary(&self, ext: &str, source: &Path) -> Result<()> {
        let command = self.command_for(ext, source)?;
        log!("compile"; "{}", source.display());

        let output = self
            .runner
            .run(&command)
            .map_err(|e| CompressError::CompilerExecution {
                command: command.clone(),
                message: e.to_string(),
            })?;

        if !output.success() {
            let mut message = output.stderr_text();
            if message.is_empty() {
                message = format!("Invalid command to CSS compiler: {command}");
            }
            return Err(CompressError::CompilerExecution { command, message });
        }
        Ok(())
    }
}
