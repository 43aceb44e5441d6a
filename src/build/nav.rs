//! The navigation forest and its nested-list rendering.

use crate::util::escape_xml;

/// One entry in the navigation forest.
///
/// The forest mirrors the nav-eligible subset of the spine tree: a node with
/// no href is a grouping heading, rendered as plain text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavNode {
    pub title: String,
    pub href: Option<String>,
    pub children: Vec<NavNode>,
}

/// Render the forest as nested ordered lists.
pub fn render_nav_list(nodes: &[NavNode]) -> String {
    let mut out = String::from("<ol>\n");
    for node in nodes {
        out.push_str("<li>");
        match &node.href {
            Some(href) => {
                out.push_str(&format!(
                    "<a href=\"{}\">{}</a>",
                    escape_xml(href),
                    escape_xml(&node.title)
                ));
            }
            None => out.push_str(&escape_xml(&node.title)),
        }
        if !node.children.is_empty() {
            out.push_str(&render_nav_list(&node.children));
        }
        out.push_str("</li>\n");
    }
    out.push_str("</ol>");
    out
}
