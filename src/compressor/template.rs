//! Reference markup pointing at the output file.

/// Default stylesheet reference.
pub const DEFAULT_CSS_TEMPLATE: &str =
    r#"<link rel="stylesheet" href="{url}" type="text/css"{close}>"#;

/// Default script reference.
pub const DEFAULT_JS_TEMPLATE: &str = r#"<script type="text/javascript" src="{url}"></script>"#;

/// Fill `{url}` and `{close}` (` /` for xhtml, empty otherwise).
pub fn render(template: &str, url: &str, xhtml: bool) -> String {
    let close = if xhtml { " /" } else { "" };
    template.replace("{url}", url).replace("{close}", close)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_css() {
        assert_eq!(
            render(DEFAULT_CSS_TEMPLATE, "/media/CACHE/css/a.css", false),
            r#"<link rel="stylesheet" href="/media/CACHE/css/a.css" type="text/css">"#
        );
        assert_eq!(
            render(DEFAULT_CSS_TEMPLATE, "/media/CACHE/css/a.css", true),
            r#"<link rel="stylesheet" href="/media/CACHE/css/a.css" type="text/css" />"#
        );
    }

    #[test]
    fn test_render_js_ignores_xhtml() {
        let expected = r#"<script type="text/javascript" src="/m/a.js"></script>"#;
        assert_eq!(render(DEFAULT_JS_TEMPLATE, "/m/a.js", false), expected);
        assert_eq!(render(DEFAULT_JS_TEMPLATE, "/m/a.js", true), expected);
    }
}
