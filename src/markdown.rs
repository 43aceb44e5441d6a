//! Markdown to XHTML fragment rendering.
//!
//! pulldown-cmark's HTML output closes void elements (`<hr />`, `<br />`,
//! `<img />`) and quotes attributes, so the fragments it produces are
//! well-formed XML and can be embedded directly in an XHTML page.

use pulldown_cmark::{Options, Parser, html};

/// Render a markdown source file into an XHTML body fragment.
pub fn render(source: &str) -> String {
    let options =
        Options::ENABLE_TABLES | Options::ENABLE_STRIKETHROUGH | Options::ENABLE_FOOTNOTES;
    let parser = Parser::new_ext(source, options);
    let mut out = String::with_capacity(source.len() * 3 / 2);
    html::push_html(&mut out, parser);
    out
}
