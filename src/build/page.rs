//! Page template rendering and title inference.

use quick_xml::Reader;
use quick_xml::events::Event;

use crate::util::escape_xml;

/// The result of generating a page: what the spine walker needs to produce
/// spine and navigation entries.
#[derive(Debug, Clone)]
pub struct PageRef {
    pub id: String,
    /// Inferred document title; `None` for raw binary assets.
    pub title: Option<String>,
    /// Store path inside the package, used as the navigation href.
    pub href: String,
}

/// Wrap a body fragment in the fixed XHTML page template.
pub fn render_xhtml(lang: &str, title: &str, head: &str, body: &str) -> String {
    format!(
        r#"<?xml version='1.0' encoding='utf-8'?>
<html xmlns:epub="http://www.idpf.org/2007/ops" xmlns="http://www.w3.org/1999/xhtml" xml:lang="{lang}">
  <head>
    <title>{title}</title>
    {head}
    <meta http-equiv="Content-Type" content="text/html; charset=utf-8"/>
  </head>
  <body>
    {body}
  </body>
</html>
"#,
        lang = escape_xml(lang),
        title = escape_xml(title),
    )
}

/// Element names probed for a document title, in priority order.
const TITLE_SELECTORS: [&[u8]; 6] = [b"title", b"h1", b"h2", b"h3", b"h4", b"h5"];

/// Infer a title from a markup fragment.
///
/// Searches for `<title>`, then `<h1>` through `<h5>`, and returns the text
/// content (descendants included) of the first element found that is
/// non-empty. Malformed markup ends the scan without erroring; the caller
/// falls back to the configured default title.
pub fn query_title(markup: &str) -> Option<String> {
    for selector in TITLE_SELECTORS {
        if let Some(text) = first_element_text(markup, selector)
            && !text.is_empty()
        {
            return Some(text);
        }
    }
    None
}

/// Text content of the first element named `tag`, or `None` if absent.
fn first_element_text(markup: &str, tag: &[u8]) -> Option<String> {
    let mut reader = Reader::from_str(markup);
    reader.config_mut().check_end_names = false;

    let mut depth = 0usize;
    let mut text = String::new();

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => {
                if depth > 0 {
                    depth += 1;
                } else if local_name(e.name().as_ref()).eq_ignore_ascii_case(tag) {
                    depth = 1;
                }
            }
            Ok(Event::Text(e)) if depth > 0 => {
                text.push_str(&String::from_utf8_lossy(e.as_ref()));
            }
            Ok(Event::GeneralRef(e)) if depth > 0 => {
                if let Some(resolved) = resolve_entity(&String::from_utf8_lossy(e.as_ref())) {
                    text.push_str(&resolved);
                }
            }
            Ok(Event::End(_)) if depth > 0 => {
                depth -= 1;
                if depth == 0 {
                    return Some(text.trim().to_string());
                }
            }
            Ok(Event::Eof) => break,
            // Lenient scan: stop at malformed markup instead of failing the build
            Err(_) => break,
            _ => {}
        }
    }

    None
}

/// Strip a namespace prefix from an element name.
fn local_name(name: &[u8]) -> &[u8] {
    match name.iter().position(|&b| b == b':') {
        Some(pos) => &name[pos + 1..],
        None => name,
    }
}

/// Resolve a named or numeric character entity.
fn resolve_entity(entity: &str) -> Option<String> {
    match entity {
        "apos" => return Some("'".to_string()),
        "quot" => return Some("\"".to_string()),
        "lt" => return Some("<".to_string()),
        "gt" => return Some(">".to_string()),
        "amp" => return Some("&".to_string()),
        "nbsp" => return Some("\u{a0}".to_string()),
        _ => {}
    }

    if let Some(hex) = entity.strip_prefix("#x") {
        if let Ok(code) = u32::from_str_radix(hex, 16)
            && let Some(c) = char::from_u32(code)
        {
            return Some(c.to_string());
        }
    } else if let Some(dec) = entity.strip_prefix('#')
        && let Ok(code) = dec.parse::<u32>()
        && let Some(c) = char::from_u32(code)
    {
        return Some(c.to_string());
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_xhtml_escapes_title() {
        let page = render_xhtml("en", "Tom & Jerry", "", "<p>hi</p>");
        assert!(page.contains("<title>Tom &amp; Jerry</title>"));
        assert!(page.contains("xml:lang=\"en\""));
        assert!(page.contains("<p>hi</p>"));
    }

    #[test]
    fn test_query_title_prefers_title_element() {
        let markup = "<title>Doc Title</title><h1>Heading</h1>";
        assert_eq!(query_title(markup).as_deref(), Some("Doc Title"));
    }

    #[test]
    fn test_query_title_heading_priority() {
        assert_eq!(
            query_title("<h2>Second</h2><h1>First</h1>").as_deref(),
            Some("First")
        );
        assert_eq!(query_title("<h3>Third</h3>").as_deref(), Some("Third"));
    }

    #[test]
    fn test_query_title_skips_empty_elements() {
        let markup = "<h1></h1><h2>Fallback</h2>";
        assert_eq!(query_title(markup).as_deref(), Some("Fallback"));
    }

    #[test]
    fn test_query_title_includes_descendant_text() {
        let markup = "<h1>My <em>Great</em> Title</h1>";
        assert_eq!(query_title(markup).as_deref(), Some("My Great Title"));
    }

    #[test]
    fn test_query_title_resolves_entities() {
        let markup = "<h1>Q &amp; A</h1>";
        assert_eq!(query_title(markup).as_deref(), Some("Q & A"));
    }

    #[test]
    fn test_query_title_none_when_no_headings() {
        assert_eq!(query_title("<p>Just a paragraph.</p>"), None);
        assert_eq!(query_title(""), None);
    }

    #[test]
    fn test_query_title_in_full_document() {
        let markup = r#"<?xml version='1.0'?>
<html xmlns="http://www.w3.org/1999/xhtml">
  <head><title>From Head</title></head>
  <body><h1>From Body</h1></body>
</html>"#;
        assert_eq!(query_title(markup).as_deref(), Some("From Head"));
    }
}
