//! Output-phase minifiers.
//!
//! Uses oxc for JavaScript and lightningcss for CSS.

use anyhow::anyhow;
use lightningcss::stylesheet::{ParserOptions, PrinterOptions, StyleSheet};
use oxc::allocator::Allocator;
use oxc::codegen::{Codegen, CodegenOptions, CommentOptions};
use oxc::mangler::MangleOptions;
use oxc::minifier::{CompressOptions, Minifier, MinifierOptions};
use oxc::parser::Parser;
use oxc::span::SourceType;

use crate::filter::Filter;

/// Minifies the combined stylesheet.
pub struct CssMin;

impl Filter for CssMin {
    fn output(&self, content: &str) -> anyhow::Result<Option<String>> {
        minify_css(content).map(Some)
    }
}

/// Minifies the combined script.
pub struct JsMin;

impl Filter for JsMin {
    fn output(&self, content: &str) -> anyhow::Result<Option<String>> {
        minify_js(content).map(Some)
    }
}

/// Minify JavaScript source code.
///
/// Parsed as a classic script: concatenated files share one global scope,
/// so top-level names are left alone.
fn minify_js(source: &str) -> anyhow::Result<String> {
    let allocator = Allocator::default();
    let ret = Parser::new(&allocator, source, SourceType::cjs()).parse();
    if let Some(err) = ret.errors.first() {
        return Err(anyhow!("js_min: {err}"));
    }
    let mut program = ret.program;
    let options = MinifierOptions {
        mangle: Some(MangleOptions::default()),
        compress: Some(CompressOptions::smallest()),
    };
    let ret = Minifier::new(options).minify(&allocator, &mut program);
    let code = Codegen::new()
        .with_options(CodegenOptions {
            minify: true,
            comments: CommentOptions::disabled(),
            ..CodegenOptions::default()
        })
        .with_scoping(ret.scoping)
        .build(&program)
        .code;
    Ok(code)
}

/// Minify CSS source code.
fn minify_css(source: &str) -> anyhow::Result<String> {
    let stylesheet = StyleSheet::parse(source, ParserOptions::default())
        .map_err(|e| anyhow!("css_min: {e}"))?;
    let result = stylesheet
        .to_css(PrinterOptions {
            minify: true,
            ..PrinterOptions::default()
        })
        .map_err(|e| anyhow!("css_min: {e}"))?;
    Ok(result.code)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_css_min() {
        let out = CssMin
            .output("p {\n  color: red;\n}\n\na { margin: 0px; }\n")
            .unwrap()
            .unwrap();
        assert!(!out.contains('\n'));
        assert!(out.contains("p{color:red}"));
    }

    #[test]
    fn test_js_min() {
        let out = JsMin
            .output("// comment\nfunction add(first, second) {\n  return first + second;\n}\n")
            .unwrap()
            .unwrap();
        assert!(!out.contains("comment"));
        assert!(out.contains("function add("));
        assert!(out.len() < 40);
    }

    #[test]
    fn test_js_min_rejects_invalid() {
        assert!(JsMin.output("function (").is_err());
    }

    #[test]
    fn test_no_input_phase() {
        use crate::filter::HunkContext;
        use crate::fragment::AssetKind;
        use crate::markup::MarkupNode;

        let node = MarkupNode::new("script", &[], "");
        let ctx = HunkContext {
            kind: AssetKind::Js,
            path: None,
            node: &node,
        };
        assert_eq!(JsMin.input("var a = 1;", &ctx).unwrap(), None);
    }
}
