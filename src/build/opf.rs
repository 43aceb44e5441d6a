//! Package description document (`content.opf`) rendering.

use tracing::warn;

use crate::config::Config;
use crate::util::{escape_xml, media_type_for};

use super::registry::ResourceRegistry;

/// Render the EPUB 3 package document: metadata, manifest, and spine.
///
/// Resources whose media type cannot be inferred from their extension are
/// omitted from the manifest (their bytes are still written to the archive);
/// each omission is logged.
pub fn generate_opf(
    config: &Config,
    registry: &ResourceRegistry,
    spine: &[String],
    identifier: &str,
    date: &str,
) -> String {
    let mut opf = String::new();

    opf.push_str(
        r#"<?xml version='1.0' encoding='utf-8'?>
<package xmlns="http://www.idpf.org/2007/opf" unique-identifier="uuid_id" version="3.0">
  <metadata xmlns:dc="http://purl.org/dc/elements/1.1/" xmlns:dcterms="http://purl.org/dc/terms/" xmlns:opf="http://www.idpf.org/2007/opf" xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance">
"#,
    );

    opf.push_str(&format!(
        "    <dc:title>{}</dc:title>\n",
        escape_xml(&config.title)
    ));
    opf.push_str(&format!(
        "    <dc:creator>{}</dc:creator>\n",
        escape_xml(&config.author)
    ));

    // The identifier appears twice by format convention: once bare, once
    // carrying the id the package element points at.
    let identifier = escape_xml(identifier);
    opf.push_str(&format!("    <dc:identifier>uuid:{identifier}</dc:identifier>\n"));
    opf.push_str(&format!(
        "    <dc:identifier id=\"uuid_id\">uuid:{identifier}</dc:identifier>\n"
    ));

    opf.push_str(&format!(
        "    <dc:language>{}</dc:language>\n",
        escape_xml(&config.lang)
    ));
    opf.push_str(&format!("    <dc:date>{}</dc:date>\n", escape_xml(date)));

    if let Some(publisher) = &config.publisher {
        opf.push_str(&format!(
            "    <dc:publisher>{}</dc:publisher>\n",
            escape_xml(publisher)
        ));
    }
    if config.cover.is_some() {
        opf.push_str("    <meta name=\"cover\" content=\"cover\"/>\n");
    }

    opf.push_str("  </metadata>\n  <manifest>\n");

    for (path, entry) in registry.iter() {
        let Some(media_type) = media_type_for(path) else {
            warn!(path, id = %entry.id, "no media type for resource; omitted from manifest");
            continue;
        };
        let properties = match &entry.properties {
            Some(props) => format!(" properties=\"{}\"", escape_xml(props)),
            None => String::new(),
        };
        opf.push_str(&format!(
            "    <item href=\"{}\" id=\"{}\" media-type=\"{}\"{}/>\n",
            escape_xml(path),
            escape_xml(&entry.id),
            media_type,
            properties
        ));
    }

    opf.push_str("  </manifest>\n  <spine>\n");

    for id in spine {
        opf.push_str(&format!("    <itemref idref=\"{}\"/>\n", escape_xml(id)));
    }

    opf.push_str("  </spine>\n</package>\n");
    opf
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> Config {
        Config {
            author: "A. Writer".to_string(),
            title: "Book & Title".to_string(),
            lang: "en".to_string(),
            uuid: None,
            publisher: Some("Press".to_string()),
            cover: Some("cover.jpg".to_string()),
            no_title: None,
            cover_title: None,
            nav_title: None,
            media: None,
            spine: Vec::new(),
        }
    }

    #[test]
    fn test_generate_opf_metadata() {
        let registry = ResourceRegistry::new();
        let opf = generate_opf(&test_config(), &registry, &[], "abc-123", "2024-01-01T00:00:00Z");

        assert!(opf.contains("<dc:title>Book &amp; Title</dc:title>"));
        assert!(opf.contains("<dc:creator>A. Writer</dc:creator>"));
        assert!(opf.contains("<dc:identifier>uuid:abc-123</dc:identifier>"));
        assert!(opf.contains("<dc:identifier id=\"uuid_id\">uuid:abc-123</dc:identifier>"));
        assert!(opf.contains("<dc:language>en</dc:language>"));
        assert!(opf.contains("<dc:date>2024-01-01T00:00:00Z</dc:date>"));
        assert!(opf.contains("<dc:publisher>Press</dc:publisher>"));
        assert!(opf.contains("<meta name=\"cover\" content=\"cover\"/>"));
    }

    #[test]
    fn test_generate_opf_manifest_and_spine() {
        let mut registry = ResourceRegistry::new();
        registry.register("page.xhtml", Some(vec![]), None, None);
        registry.register("nav.xhtml", Some(vec![]), Some("nav"), Some("nav"));
        let spine = vec!["id1".to_string()];

        let opf = generate_opf(&test_config(), &registry, &spine, "u", "d");
        assert!(opf.contains(
            "<item href=\"page.xhtml\" id=\"id1\" media-type=\"application/xhtml+xml\"/>"
        ));
        assert!(opf.contains(
            "<item href=\"nav.xhtml\" id=\"nav\" media-type=\"application/xhtml+xml\" properties=\"nav\"/>"
        ));
        assert!(opf.contains("<itemref idref=\"id1\"/>"));
    }

    #[test]
    fn test_generate_opf_omits_unknown_media_types() {
        let mut registry = ResourceRegistry::new();
        registry.register("mystery.bin", Some(vec![]), None, None);
        let opf = generate_opf(&test_config(), &registry, &[], "u", "d");
        assert!(!opf.contains("mystery.bin"));
    }

    #[test]
    fn test_generate_opf_no_optional_metadata() {
        let mut config = test_config();
        config.publisher = None;
        config.cover = None;
        let registry = ResourceRegistry::new();
        let opf = generate_opf(&config, &registry, &[], "u", "d");
        assert!(!opf.contains("dc:publisher"));
        assert!(!opf.contains("name=\"cover\""));
    }
}
