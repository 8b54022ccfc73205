//! URL ↔ filesystem mapping under the media root.

use std::path::{Component, Path, PathBuf};

use percent_encoding::percent_decode_str;

use crate::error::{CompressError, Result};

/// Maps public URLs under `media_url` to files under `media_root`.
#[derive(Debug, Clone)]
pub struct PathMapper {
    media_url: String,
    media_root: PathBuf,
}

impl PathMapper {
    /// `media_url` gains a trailing `/` when it lacks one, so `/media`
    /// never matches `/mediafoo/...`.
    pub fn new(media_url: impl Into<String>, media_root: impl Into<PathBuf>) -> Self {
        let mut media_url = media_url.into();
        if !media_url.ends_with('/') {
            media_url.push('/');
        }
        Self {
            media_url,
            media_root: media_root.into(),
        }
    }

    pub fn media_url(&self) -> &str {
        &self.media_url
    }

    pub fn media_root(&self) -> &Path {
        &self.media_root
    }

    /// Resolve a URL to its file below the media root.
    ///
    /// Query string and fragment are dropped and percent-escapes decoded.
    /// URLs outside `media_url` fail with `UnresolvableAsset`.
    pub fn resolve(&self, url: &str) -> Result<PathBuf> {
        let unresolvable = || CompressError::UnresolvableAsset {
            url: url.to_owned(),
            media_url: self.media_url.clone(),
        };

        let relative = url.strip_prefix(&self.media_url).ok_or_else(unresolvable)?;
        let relative = relative
            .split(['?', '#'])
            .next()
            .unwrap_or_default()
            .trim_start_matches('/');
        let decoded = percent_decode_str(relative).decode_utf8_lossy();

        // Keep lookups inside the media root
        let rel_path = Path::new(decoded.as_ref());
        if rel_path
            .components()
            .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir))
        {
            return Err(unresolvable());
        }

        Ok(self.media_root.join(rel_path))
    }

    /// Public URL of a file below the media root.
    pub fn url_for(&self, path: &Path) -> Option<String> {
        let relative = path.strip_prefix(&self.media_root).ok()?;
        let parts: Vec<_> = relative
            .components()
            .filter_map(|c| match c {
                Component::Normal(s) => Some(s.to_string_lossy()),
                _ => None,
            })
            .collect();
        Some(format!(
            "{}/{}",
            self.media_url.trim_end_matches('/'),
            parts.join("/")
        ))
    }
}
