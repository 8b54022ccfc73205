//! Script extraction. Scripts are never compiled.

use super::{AssetKind, ExtractContext, Fragment, is_candidate, lenient, reference};
use crate::error::Result;
use crate::markup::MarkupNode;

pub(super) fn extract(nodes: &[MarkupNode], ctx: &ExtractContext) -> Result<Vec<Fragment>> {
    let mut fragments = Vec::new();
    for node in nodes.iter().filter(|n| is_candidate(n, AssetKind::Js)) {
        match reference(node) {
            Some(src) => {
                let linked = ctx
                    .mapper
                    .resolve(src)
                    .map(|path| Fragment::file(AssetKind::Js, path, node.clone()));
                if let Some(fragment) = lenient(ctx, linked)? {
                    fragments.push(fragment);
                }
            }
            None => fragments.push(Fragment::inline(
                AssetKind::Js,
                node.text().to_owned(),
                node.clone(),
            )),
        }
    }
    Ok(fragments)
}
