//! Build configuration: the declarative content tree supplied by the user.
//!
//! A config file is YAML or JSON, selected by extension. `author`, `title`,
//! `lang`, and `spine` are required; everything else is optional.

use std::borrow::Cow;
use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::error::{Error, Result};

/// Top-level build configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub author: String,
    pub title: String,
    pub lang: String,
    pub uuid: Option<String>,
    pub publisher: Option<String>,
    /// Path to a cover image, registered with id `cover`.
    pub cover: Option<String>,
    /// Fallback title for pages where no title can be inferred.
    pub no_title: Option<String>,
    pub cover_title: Option<String>,
    pub nav_title: Option<String>,
    /// Directory whose files are all bundled into the package.
    pub media: Option<String>,
    pub spine: Vec<SpineNode>,
}

/// A spine entry: either a bare content path or a full node description.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum SpineNode {
    Path(String),
    Node(SpineNodeSpec),
}

/// The object form of a spine node.
///
/// At most one of `path`, `cover_page`, and `nav_page` takes effect, checked
/// in that order. A node with none of the three registers nothing but still
/// has its children walked, which allows purely organizational grouping
/// nodes in the tree.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SpineNodeSpec {
    /// Explicit navigation title, overriding any inferred title.
    pub title: Option<String>,
    /// Content file path (`.md` is rendered, `.html`/`.xhtml` passed through,
    /// anything else stored as a raw asset).
    pub path: Option<String>,
    /// In-document anchor appended to the nav href as `href#anchor`.
    pub anchor: Option<String>,
    /// Image path for a generated full-bleed cover page.
    pub cover_page: Option<String>,
    /// Reserve this slot in the reading order for the navigation document.
    #[serde(default)]
    pub nav_page: bool,
    /// Navigation inclusion. Absent means include; only an explicit
    /// `false` suppresses the entry.
    pub nav: Option<bool>,
    pub nodes: Option<Vec<SpineNode>>,
}

impl SpineNode {
    /// Normalize a bare path into the object form.
    pub fn spec(&self) -> Cow<'_, SpineNodeSpec> {
        match self {
            SpineNode::Path(path) => Cow::Owned(SpineNodeSpec {
                path: Some(path.clone()),
                ..SpineNodeSpec::default()
            }),
            SpineNode::Node(spec) => Cow::Borrowed(spec),
        }
    }
}

impl Config {
    /// Load a config file, dispatching on its extension.
    ///
    /// `.json` is parsed with serde_json, `.yaml`/`.yml` with serde_yaml.
    /// Any other extension is a configuration error. Parse failures,
    /// including missing required fields, are configuration errors too.
    pub fn load(path: impl AsRef<Path>) -> Result<Config> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|e| Error::resource(path, e))?;

        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or_default();
        let config: Config = match extension {
            "json" => serde_json::from_str(&text)
                .map_err(|e| Error::Config(format!("invalid config {}: {e}", path.display())))?,
            "yaml" | "yml" => serde_yaml::from_str(&text)
                .map_err(|e| Error::Config(format!("invalid config {}: {e}", path.display())))?,
            other => {
                return Err(Error::Config(format!(
                    "unsupported config extension {other:?} (expected .yaml, .yml, or .json)"
                )));
            }
        };

        Ok(config)
    }

    pub fn no_title(&self) -> &str {
        self.no_title.as_deref().unwrap_or("No Title")
    }

    pub fn cover_title(&self) -> &str {
        self.cover_title.as_deref().unwrap_or("Cover")
    }

    pub fn nav_title(&self) -> &str {
        self.nav_title.as_deref().unwrap_or("Navigation")
    }

    /// Default output location when the CLI is given no `--output`.
    pub fn default_output(&self) -> String {
        format!("{}.epub", self.title)
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn test_parse_yaml_spine_forms() {
        let yaml = r#"
author: A. Writer
title: My Book
lang: en
spine:
  - intro.md
  - title: Part One
    nodes:
      - chapter1.md
      - path: chapter2.md
        anchor: section-2
        nav: false
  - nav_page: true
"#;
        let config: Config = serde_yaml::from_str(yaml).expect("valid yaml");
        assert_eq!(config.author, "A. Writer");
        assert_eq!(config.spine.len(), 3);

        assert!(matches!(&config.spine[0], SpineNode::Path(p) if p == "intro.md"));

        let part = config.spine[1].spec();
        assert_eq!(part.title.as_deref(), Some("Part One"));
        assert!(part.path.is_none());
        let children = part.nodes.as_ref().expect("children");
        assert_eq!(children.len(), 2);
        let ch2 = children[1].spec();
        assert_eq!(ch2.anchor.as_deref(), Some("section-2"));
        assert_eq!(ch2.nav, Some(false));

        let nav = config.spine[2].spec();
        assert!(nav.nav_page);
    }

    #[test]
    fn test_parse_json() {
        let json = r#"{
            "author": "A",
            "title": "T",
            "lang": "en",
            "spine": ["a.md"]
        }"#;
        let config: Config = serde_json::from_str(json).expect("valid json");
        assert_eq!(config.lang, "en");
        assert_eq!(config.no_title(), "No Title");
        assert_eq!(config.cover_title(), "Cover");
        assert_eq!(config.nav_title(), "Navigation");
        assert_eq!(config.default_output(), "T.epub");
    }

    #[test]
    fn test_bare_path_normalizes_to_content_page() {
        let node = SpineNode::Path("chapter.md".to_string());
        let spec = node.spec();
        assert_eq!(spec.path.as_deref(), Some("chapter.md"));
        assert!(!spec.nav_page);
        assert!(spec.nav.is_none());
    }

    #[test]
    fn test_missing_required_field_is_config_error() {
        let mut file = tempfile::Builder::new()
            .suffix(".yaml")
            .tempfile()
            .expect("tempfile");
        writeln!(file, "title: T\nlang: en\nspine: []").expect("write");

        let err = Config::load(file.path()).expect_err("author is required");
        match err {
            Error::Config(msg) => assert!(msg.contains("author"), "unexpected message: {msg}"),
            other => panic!("expected config error, got {other}"),
        }
    }

    #[test]
    fn test_unsupported_extension_is_config_error() {
        let file = tempfile::Builder::new()
            .suffix(".toml")
            .tempfile()
            .expect("tempfile");

        let err = Config::load(file.path()).expect_err("toml is not supported");
        assert!(matches!(err, Error::Config(_)));
    }
}
