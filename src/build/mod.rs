//! The content/package builder.
//!
//! One synchronous pass over the config's content tree: register the fixed
//! stylesheets, the cover image, and any bundled media, walk the spine to
//! produce the reading order and the navigation forest in lockstep, render
//! the navigation document and the package document, then assemble the zip
//! container.

mod container;
mod nav;
mod opf;
mod page;
pub mod registry;

use std::fs::{self, File};
use std::io::{self, Seek, Write};
use std::path::Path;

use chrono::{SecondsFormat, Utc};
use tracing::debug;

use crate::config::{Config, SpineNode};
use crate::error::{Error, Result};
use crate::{markdown, util};

use page::PageRef;
pub use nav::NavNode;
pub use registry::{ManifestEntry, ResourceRegistry};

const NAV_PATH: &str = "nav.xhtml";
const COVER_PAGE_PATH: &str = "cover_page.xhtml";

const PAGE_STYLES_CSS: &str = "@page {
  margin-bottom: 5pt;
  margin-top: 5pt;
}
";

const STYLESHEET_CSS: &str = "rt {
  user-select: none;
}
img {
  max-width: 100%;
}
table, th, td {
  border: 1px solid currentColor;
  border-collapse: collapse;
}
";

/// Build the package described by `config` and write it to `writer`.
pub fn build_package<W: Write + Seek>(config: &Config, writer: W) -> Result<()> {
    PackageBuilder::new(config).build(writer)
}

/// Build the package and write it to a file at `path`.
pub fn build_to_path(config: &Config, path: impl AsRef<Path>) -> Result<()> {
    let file = File::create(path.as_ref())?;
    build_package(config, file)
}

struct PackageBuilder<'a> {
    config: &'a Config,
    registry: ResourceRegistry,
    /// Head-injection fragment linking the two fixed stylesheets, shared by
    /// every generated page.
    style_links: String,
}

impl<'a> PackageBuilder<'a> {
    fn new(config: &'a Config) -> Self {
        Self {
            config,
            registry: ResourceRegistry::new(),
            style_links: String::new(),
        }
    }

    fn build<W: Write + Seek>(mut self, writer: W) -> Result<()> {
        self.add_styles();
        self.add_cover()?;
        self.add_media()?;

        let config = self.config;
        let mut nav_root = Vec::new();
        let spine = self.walk_spine(&config.spine, &mut nav_root)?;
        debug!(
            resources = self.registry.len(),
            spine = spine.len(),
            "content tree walked"
        );

        self.add_nav(&nav_root);

        let identifier = self.config.uuid.clone().unwrap_or_else(util::uuid_v4);
        let date = Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true);
        let opf = opf::generate_opf(self.config, &self.registry, &spine, &identifier, &date);

        container::write_container(writer, &opf, &self.registry)
    }

    /// Register the two fixed stylesheets and cache the link fragment.
    fn add_styles(&mut self) {
        self.style_links = "<link href=\"page-styles.css\" rel=\"stylesheet\" type=\"text/css\"/>\n    <link href=\"stylesheet.css\" rel=\"stylesheet\" type=\"text/css\"/>".to_string();
        self.registry.register(
            "page-styles.css",
            Some(PAGE_STYLES_CSS.as_bytes().to_vec()),
            Some("page-styles"),
            None,
        );
        self.registry.register(
            "stylesheet.css",
            Some(STYLESHEET_CSS.as_bytes().to_vec()),
            Some("stylesheet"),
            None,
        );
    }

    /// Register the configured cover image, if any.
    fn add_cover(&mut self) -> Result<()> {
        let Some(cover) = &self.config.cover else {
            return Ok(());
        };
        let bytes = fs::read(cover).map_err(|e| Error::resource(cover, e))?;
        self.registry
            .register(cover, Some(bytes), Some("cover"), Some("cover"));
        Ok(())
    }

    /// Register every regular file under the configured media folder.
    ///
    /// Files are registered under their base file name as id, in the order
    /// the directory walk yields them; directories themselves are not
    /// registered.
    fn add_media(&mut self) -> Result<()> {
        let Some(media) = &self.config.media else {
            return Ok(());
        };
        for entry in walkdir::WalkDir::new(media) {
            let entry = entry.map_err(io::Error::other)?;
            if !entry.file_type().is_file() {
                continue;
            }
            let path = entry.path();
            let bytes = fs::read(path).map_err(|e| Error::resource(path, e))?;
            let id = entry.file_name().to_string_lossy().to_string();
            self.registry
                .register(&path.to_string_lossy(), Some(bytes), Some(&id), None);
        }
        Ok(())
    }

    /// Walk one level of the spine tree.
    ///
    /// Returns the spine ids produced by this subtree in pre-order, parent
    /// before children. `nav_list` is the navigation list for the current
    /// nesting level; a node's children nest under its own nav entry when
    /// one was created, and fall back to the current level otherwise.
    fn walk_spine(
        &mut self,
        nodes: &[SpineNode],
        nav_list: &mut Vec<NavNode>,
    ) -> Result<Vec<String>> {
        let mut spine = Vec::new();

        for node in nodes {
            let spec = node.spec();

            let generated = if let Some(path) = &spec.path {
                Some(self.gen_page(path)?)
            } else if let Some(image) = &spec.cover_page {
                Some(self.gen_cover_page(image)?)
            } else if spec.nav_page {
                // The nav document is generated after the walk; this only
                // reserves its slot in the reading order.
                Some(PageRef {
                    id: "nav".to_string(),
                    title: Some(self.config.nav_title().to_string()),
                    href: NAV_PATH.to_string(),
                })
            } else {
                None
            };

            if let Some(page) = &generated {
                spine.push(page.id.clone());
            }

            let mut entered = false;
            if spec.nav.unwrap_or(true) {
                let title = spec
                    .title
                    .clone()
                    .or_else(|| generated.as_ref().and_then(|p| p.title.clone()))
                    .or_else(|| spec.path.as_deref().map(|p| util::file_stem(p).to_string()));
                if let Some(title) = title {
                    let href = generated.as_ref().map(|page| match &spec.anchor {
                        Some(anchor) => format!("{}#{anchor}", page.href),
                        None => page.href.clone(),
                    });
                    nav_list.push(NavNode {
                        title,
                        href,
                        children: Vec::new(),
                    });
                    entered = true;
                }
            }

            if let Some(children) = &spec.nodes {
                match nav_list.last_mut() {
                    Some(slot) if entered => {
                        spine.extend(self.walk_spine(children, &mut slot.children)?);
                    }
                    _ => spine.extend(self.walk_spine(children, nav_list)?),
                }
            }
        }

        Ok(spine)
    }

    /// Generate an ordinary content page from a file path.
    fn gen_page(&mut self, path: &str) -> Result<PageRef> {
        if path.ends_with(".md") {
            let source = fs::read_to_string(path).map_err(|e| Error::resource(path, e))?;
            let body = markdown::render(&source);
            let title =
                page::query_title(&body).unwrap_or_else(|| self.config.no_title().to_string());
            let document = page::render_xhtml(&self.config.lang, &title, &self.style_links, &body);
            // Suffix rather than replace, so the source file is never shadowed
            let store_path = format!("{path}.xhtml");
            let id = self
                .registry
                .register(&store_path, Some(document.into_bytes()), None, None);
            Ok(PageRef {
                id,
                title: Some(title),
                href: store_path,
            })
        } else if path.ends_with(".html") || path.ends_with(".xhtml") {
            let content = fs::read_to_string(path).map_err(|e| Error::resource(path, e))?;
            let title =
                page::query_title(&content).unwrap_or_else(|| self.config.no_title().to_string());
            let id = self
                .registry
                .register(path, Some(content.into_bytes()), None, None);
            Ok(PageRef {
                id,
                title: Some(title),
                href: path.to_string(),
            })
        } else {
            let content = fs::read(path).map_err(|e| Error::resource(path, e))?;
            let id = self.registry.register(path, Some(content), None, None);
            Ok(PageRef {
                id,
                title: None,
                href: path.to_string(),
            })
        }
    }

    /// Generate the full-bleed cover page wrapping an image in an SVG.
    fn gen_cover_page(&mut self, image_path: &str) -> Result<PageRef> {
        let bytes = fs::read(image_path).map_err(|e| Error::resource(image_path, e))?;
        let (width, height) = util::extract_image_dimensions(&bytes).ok_or_else(|| {
            Error::resource(
                image_path,
                io::Error::new(io::ErrorKind::InvalidData, "unrecognized image format"),
            )
        })?;

        let title = self.config.cover_title().to_string();
        let head = r#"<style type="text/css" title="override_css">
      @page { padding: 0pt; margin: 0pt }
      body { text-align: center; padding: 0pt; margin: 0pt; }
    </style>"#;
        let body = format!(
            r#"<div>
      <svg xmlns="http://www.w3.org/2000/svg" xmlns:xlink="http://www.w3.org/1999/xlink" version="1.1" width="100%" height="100%" viewBox="0 0 {width} {height}" preserveAspectRatio="none">
        <image width="{width}" height="{height}" xlink:href="{href}"/>
      </svg>
    </div>"#,
            href = util::escape_xml(image_path),
        );
        let document = page::render_xhtml(&self.config.lang, &title, head, &body);
        let id = self.registry.register(
            COVER_PAGE_PATH,
            Some(document.into_bytes()),
            Some("cover-page"),
            Some("svg"),
        );
        Ok(PageRef {
            id,
            title: Some(title),
            href: COVER_PAGE_PATH.to_string(),
        })
    }

    /// Serialize the nav forest and register the navigation document.
    fn add_nav(&mut self, nav_root: &[NavNode]) {
        let body = format!(
            "<nav epub:type=\"toc\">\n{}\n</nav>",
            nav::render_nav_list(nav_root)
        );
        let document = page::render_xhtml(
            &self.config.lang,
            self.config.nav_title(),
            &self.style_links,
            &body,
        );
        self.registry.register(
            NAV_PATH,
            Some(document.into_bytes()),
            Some("nav"),
            Some("nav"),
        );
    }
}
