//! Zip container assembly.

use std::io::{Seek, Write};

use zip::ZipWriter;
use zip::write::SimpleFileOptions;

use crate::error::Result;

use super::registry::ResourceRegistry;

pub const OPF_PATH: &str = "content.opf";

const MIMETYPE: &str = "application/epub+zip";

const CONTAINER_XML: &str = r#"<?xml version="1.0"?>
<container version="1.0" xmlns="urn:oasis:names:tc:opendocument:xmlns:container">
  <rootfiles>
    <rootfile full-path="content.opf" media-type="application/oebps-package+xml"/>
  </rootfiles>
</container>
"#;

/// Write the package archive.
///
/// Fixed entry order: `mimetype` first and uncompressed, then the container
/// pointer, then the package document, then every registered resource that
/// carries content. Entries with absent content are skipped.
pub fn write_container<W: Write + Seek>(
    writer: W,
    opf: &str,
    registry: &ResourceRegistry,
) -> Result<()> {
    let mut zip = ZipWriter::new(writer);

    let options_stored =
        SimpleFileOptions::default().compression_method(zip::CompressionMethod::Stored);
    let options_deflate =
        SimpleFileOptions::default().compression_method(zip::CompressionMethod::Deflated);

    zip.start_file("mimetype", options_stored)?;
    zip.write_all(MIMETYPE.as_bytes())?;

    zip.start_file("META-INF/container.xml", options_deflate)?;
    zip.write_all(CONTAINER_XML.as_bytes())?;

    zip.start_file(OPF_PATH, options_deflate)?;
    zip.write_all(opf.as_bytes())?;

    for (path, entry) in registry.iter() {
        if let Some(content) = &entry.content {
            zip.start_file(path, options_deflate)?;
            zip.write_all(content)?;
        }
    }

    zip.finish()?;
    Ok(())
}
