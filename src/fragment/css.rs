//! Stylesheet extraction.
//!
//! Linked `.ccss`-style sources are compiled before they become fragments:
//! in-process when a transform is registered, otherwise by the external
//! binary writing a native sibling, which the fragment then points at.

use std::path::Path;

use super::{AssetKind, ExtractContext, Fragment, lenient, reference};
use crate::compiler::native_sibling;
use crate::debug;
use crate::error::{CompressError, Result};
use crate::markup::MarkupNode;

pub(super) fn extract(nodes: &[MarkupNode], ctx: &ExtractContext) -> Result<Vec<Fragment>> {
    let mut fragments = Vec::new();
    for node in nodes {
        match node.tag() {
            "link" if is_stylesheet(node) => {
                if let Some(fragment) = lenient(ctx, linked(node, ctx))? {
                    fragments.push(fragment);
                }
            }
            "style" => fragments.push(inline(node, ctx)?),
            _ => {}
        }
    }
    Ok(fragments)
}

/// `rel` contains the `stylesheet` token.
pub(super) fn is_stylesheet(node: &MarkupNode) -> bool {
    node.attr("rel").is_some_and(|rel| {
        rel.split_ascii_whitespace()
            .any(|token| token.eq_ignore_ascii_case("stylesheet"))
    })
}

fn linked(node: &MarkupNode, ctx: &ExtractContext) -> Result<Fragment> {
    let path = ctx.mapper.resolve(reference(node).unwrap_or_default())?;

    let Some(ext) = dotted_extension(&path).filter(|ext| ctx.compilers.is_compiled(ext)) else {
        return Ok(Fragment::file(AssetKind::Css, path, node.clone()));
    };

    match ctx.compilers.compile_file_in_process(&ext, &path) {
        Ok(css) => return Ok(Fragment::compiled(AssetKind::Css, css, path, node.clone())),
        Err(CompressError::TransformUnavailable { .. }) => {}
        Err(err) => return Err(err),
    }

    if ctx.compilers.needs_recompile(&path) {
        ctx.compilers.compile_binary(&ext, &path)?;
    } else {
        debug!("compile"; "{} is up to date", path.display());
    }

    let native = native_sibling(&path);
    let node = node.retarget(&file_name(&path), &file_name(&native));
    Ok(Fragment::file(AssetKind::Css, native, node))
}

fn inline(node: &MarkupNode, ctx: &ExtractContext) -> Result<Fragment> {
    let text = node.text().to_owned();
    let content_type = node.attr("type").unwrap_or_default().to_ascii_lowercase();
    if content_type.is_empty() || content_type == "text/css" {
        return Ok(Fragment::inline(AssetKind::Css, text, node.clone()));
    }

    // Both `text/ccss` and bare `ccss` name the same format.
    let subtype = content_type
        .split_once('/')
        .map_or(content_type.as_str(), |(_, subtype)| subtype);
    let ext = format!(".{subtype}");

    let css = match ctx.compilers.compile_in_process(&ext, &text) {
        Err(CompressError::TransformUnavailable { ext }) => {
            return Err(CompressError::config(format!(
                "inline style of type `{content_type}` needs an in-process transform for `{ext}`"
            )));
        }
        other => other?,
    };
    Ok(Fragment::inline(AssetKind::Css, css, node.clone()))
}

/// Extension with its leading dot, e.g. `.ccss`.
fn dotted_extension(path: &Path) -> Option<String> {
    let ext = path.extension()?.to_str()?;
    Some(format!(".{ext}"))
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}
