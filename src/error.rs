//! Error taxonomy for extraction, compilation, filtering and output.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while compressing a markup block.
#[derive(Debug, Error)]
pub enum CompressError {
    /// A referenced URL lies outside the managed media url.
    #[error("\"{url}\" is not in media_url (\"{media_url}\") and can not be compressed")]
    UnresolvableAsset { url: String, media_url: String },

    /// No in-process transform is registered for the extension.
    #[error("no in-process transform registered for `{ext}`")]
    TransformUnavailable { ext: String },

    /// Compiled format or filter setup is unusable.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// External compiler exited non-zero (or could not be spawned).
    #[error("compiler command `{command}` failed:\n{message}")]
    CompilerExecution { command: String, message: String },

    /// In-process transform rejected its input.
    #[error("`{ext}` transform failed")]
    Transform {
        ext: String,
        #[source]
        source: anyhow::Error,
    },

    #[error("IO error when accessing `{}`", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Markup block could not be parsed into nodes.
    #[error("markup parsing error: {0}")]
    Markup(String),

    /// Bad `compress` tag arguments.
    #[error("template syntax error: {0}")]
    TagSyntax(String),

    // Filters own their failures; they pass through untouched.
    #[error(transparent)]
    Filter(#[from] anyhow::Error),
}

impl CompressError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }

    pub const fn is_unresolvable(&self) -> bool {
        matches!(self, Self::UnresolvableAsset { .. })
    }
}

pub type Result<T, E = CompressError> = std::result::Result<T, E>;
